//! Effects - side effects declared by the reducer

use crate::catalog::SearchToken;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Resolve a token into summaries, tagged with the request id
    LoadCatalog { request: u64, token: SearchToken },
    LoadSpecies { id: u32 },
    LoadSprite { url: String },
    PlayCry { url: String },
}
