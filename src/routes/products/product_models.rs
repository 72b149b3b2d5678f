use serde::Deserialize;

// Shared by create and update; the image is an optional URL reference
// (uploads are handled elsewhere).
#[derive(Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}
