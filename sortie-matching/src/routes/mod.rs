use diesel::prelude::*;
use uuid::Uuid;

use sortie_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::Profile;
use crate::schema::profiles;

pub mod discover;
pub mod health;
pub mod interactions;
pub mod matches;
pub mod proposals;
pub mod quota;
pub mod requests;

/// Resolve the caller's profile from the credential id carried by the
/// token. Every authenticated handler starts here.
pub(crate) fn profile_for(conn: &mut PgConnection, credential_id: Uuid) -> AppResult<Profile> {
    profiles::table
        .filter(profiles::credential_id.eq(credential_id))
        .first::<Profile>(conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))
}
