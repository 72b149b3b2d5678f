use serde::Deserialize;

// Field names follow the operator-creation form.
#[derive(Deserialize)]
pub struct CreateOperatorRequest {
    pub name: String,
    pub email: String,
    #[serde(rename = "phoneNum")]
    pub phone_num: String,
}
