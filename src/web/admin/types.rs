use serde::Deserialize;

/// A reviewer's verdict as posted by the approve / reject buttons.
#[derive(Deserialize)]
pub struct DecisionForm {
    #[serde(default)]
    pub certificate_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Default, Deserialize)]
pub struct VerifyQuery {
    pub id: Option<String>,
}
