//! Campaign resource

use crate::resource::{Reply, Resource, ResourceRequest, Status};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Human {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Read-only resource; POST keeps the default 405
pub struct Campaign;

impl Resource for Campaign {
    type Payload = Human;

    fn get(&self, _req: &ResourceRequest<'_>) -> Reply<Human> {
        let boy = Human {
            name: "boy".to_string(),
        };
        (Status::success(200), Some(boy))
    }
}
