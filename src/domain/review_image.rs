use serde::Deserialize;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
pub const MAX_IMAGE_SIZE_BYTES: u64 = 20 * 1024 * 1024;
pub const MAX_IMAGES_PER_REVIEW: usize = 5;

// Reference to an image already uploaded to file storage
#[derive(Deserialize, Debug, Clone)]
pub struct ReviewImage{
    pub url: String,
    pub size: u64
}

impl ReviewImage {
    pub fn validate(&self) -> Result<(), String>{
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        let extension = path.rsplit_once('.')
                            .map(|(_, ext)| ext.to_lowercase())
                            .unwrap_or_default();

        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err("Invalid image format, only jpg, jpeg, png and webp are allowed".into())
        }

        if self.size >= MAX_IMAGE_SIZE_BYTES {
            return Err("Image size must be less than 20MB".into())
        }

        Ok(())
    }
}

pub fn validate_images(images: &[ReviewImage]) -> Result<Vec<String>, String>{
    if images.len() > MAX_IMAGES_PER_REVIEW {
        return Err(format!("A review can have at most {} images", MAX_IMAGES_PER_REVIEW))
    }

    images.iter()
        .map(|image| image.validate().map(|_| image.url.clone()))
        .collect()
}
