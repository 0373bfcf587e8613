//! Operational Info Endpoints

use axum::{extract::State, Json};

use crate::{types::ContactInfo, AppState};

/// GET /api/loans/build-info
pub async fn build_info(State(state): State<AppState>) -> String {
    state.config.build_version.clone()
}

/// GET /api/loans/contact-info
pub async fn contact_info(State(state): State<AppState>) -> Json<ContactInfo> {
    Json(state.config.contact_info.clone())
}
