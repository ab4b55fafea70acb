//! Vehicle reads and creation.

use crate::directus::client::{Auth, DirectusClient};
use crate::directus::error::RemoteError;
use crate::directus::types::{NewVehicle, RecordId, Vehicle};
use crate::resilience::{describe, run, Envelope};

const VEHICLE_FIELDS: &str = "id,Placa,Tipo,Ciudad,Usuario";

impl DirectusClient {
    fn vehicles_path(&self) -> String {
        format!("items/{}", self.config().collections.vehicles)
    }

    /// All vehicles visible to the session, in backend order.
    ///
    /// Any failure yields an empty list; this backs display paths only.
    pub async fn list_vehicles(&self) -> Vec<Vehicle> {
        let path = self.vehicles_path();
        run("listing vehicles", self.deadline(), || async {
            self.get::<Vec<Vehicle>>(&path, &[]).await
        })
        .await
        .unwrap_or(Vec::new())
    }

    /// One vehicle by id. `Ok(None)` when no record matches.
    pub async fn get_vehicle(&self, id: &str) -> Envelope<Option<Vehicle>> {
        let path = self.vehicles_path();
        let query = [
            ("fields", VEHICLE_FIELDS.to_string()),
            ("filter[id][_eq]", id.to_string()),
            ("limit", "1".to_string()),
        ];

        let envelope = run("reading vehicle", self.deadline(), || async {
            let matches: Vec<Vehicle> = self.get(&path, &query).await?;
            Ok(matches.into_iter().next())
        })
        .await;

        if let Envelope::Ok(None) = envelope {
            tracing::debug!(id, "Vehicle not found");
        }
        envelope
    }

    /// Create a vehicle in the configured default city.
    ///
    /// `acting_user` becomes the owner; pass `None` when the caller does not
    /// know who is acting and the record is stored without an owner.
    pub async fn create_vehicle(
        &self,
        plate: &str,
        kind: &str,
        acting_user: Option<&RecordId>,
    ) -> Envelope<Vehicle> {
        let plate = plate.trim();
        let kind = kind.trim();
        if plate.is_empty() || kind.is_empty() {
            return Envelope::Err(describe(&RemoteError::Validation(
                "plate and vehicle type are required".into(),
            )));
        }

        tracing::info!(plate, kind, owner = ?acting_user.map(RecordId::as_str), "Creating vehicle");
        let path = self.vehicles_path();
        let body = NewVehicle {
            plate,
            kind,
            city: &self.config().defaults.vehicle_city,
            owner: acting_user,
        };

        run("creating vehicle", self.deadline(), || async {
            self.post(&path, &body, Auth::Session).await
        })
        .await
    }
}
