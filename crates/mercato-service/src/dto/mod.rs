//! Data Transfer Objects (DTOs).

mod contact_dto;
mod listing_dto;
mod profile_dto;
mod proposal_dto;

pub use contact_dto::*;
pub use listing_dto::*;
pub use profile_dto::*;
pub use proposal_dto::*;
