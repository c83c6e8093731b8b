use crate::domain::model::TopMaster;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterCard {
    pub name: String,
    pub rating_label: String,
}

impl From<&TopMaster> for MasterCard {
    fn from(master: &TopMaster) -> Self {
        Self {
            name: master.name.clone(),
            rating_label: master.rating.label(),
        }
    }
}

/// Cards in server order (already ranked by rating).
pub fn render_cards(masters: &[TopMaster]) -> Vec<MasterCard> {
    masters.iter().map(MasterCard::from).collect()
}
