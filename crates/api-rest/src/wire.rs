//! JSON wire models for the REST host.
//!
//! Core types stay free of OpenAPI concerns; these structs mirror them with `ToSchema` derives
//! and are built from the core read models.

use pview_core::{Layout, NavigationEntry, RenderModel, SessionSnapshot};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRes {
    pub header_height: u32,
    pub duration_ms: u32,
    pub easing: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntryRes {
    pub state: String,
    pub selected_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRes {
    pub state: String,
    pub selected_id: Option<String>,
    pub history: Vec<NavigationEntryRes>,
    pub history_depth: usize,
    pub can_go_back: bool,
    pub layout: LayoutRes,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderRes {
    pub snapshot: SnapshotRes,
    pub effective_layout: LayoutRes,
    pub narrow: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MountViewReq {
    pub patient_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MountViewRes {
    pub view_id: String,
    pub snapshot: SnapshotRes,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPatientReq {
    pub patient_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionReq {
    /// One of `default`, `summary`, `note`, `fullView`.
    pub state: String,
    #[serde(default)]
    pub selected_id: Option<String>,
}

impl From<&Layout> for LayoutRes {
    fn from(layout: &Layout) -> Self {
        Self {
            header_height: layout.header_height,
            duration_ms: layout.duration_ms,
            easing: layout.easing.as_str().to_string(),
        }
    }
}

impl From<&NavigationEntry> for NavigationEntryRes {
    fn from(entry: &NavigationEntry) -> Self {
        Self {
            state: entry.state.to_string(),
            selected_id: entry.selected_id.as_ref().map(|id| id.to_string()),
        }
    }
}

impl From<&SessionSnapshot> for SnapshotRes {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            state: snapshot.state.to_string(),
            selected_id: snapshot.selected_id.as_ref().map(|id| id.to_string()),
            history: snapshot.history.iter().map(NavigationEntryRes::from).collect(),
            history_depth: snapshot.history_depth,
            can_go_back: snapshot.can_go_back,
            layout: LayoutRes::from(&snapshot.layout),
        }
    }
}

impl From<&RenderModel> for RenderRes {
    fn from(model: &RenderModel) -> Self {
        Self {
            snapshot: SnapshotRes::from(&model.snapshot),
            effective_layout: LayoutRes::from(&model.effective_layout),
            narrow: model.narrow,
        }
    }
}
