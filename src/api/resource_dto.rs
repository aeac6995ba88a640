use serde::Deserialize;

use crate::domain::portal::ResourceId;

/// Creation responses carry more fields, but the id is the only one the
/// client consumes: it seeds the next call in the submission sequence.
#[derive(Debug, Deserialize)]
pub struct ResourceCreatedDto {
    pub id: ResourceId,
}
