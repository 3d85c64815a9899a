//! Product form extraction and image upload validation
//!
//! Product create/update accepts either `multipart/form-data` (text fields
//! plus up to five `images` parts) or a plain JSON body.

use axum::{
    extract::{multipart::Field, FromRequest, Multipart, Request},
    http::{header, StatusCode},
};

use greencart::{services::catalog::parse_tags, ImageUpload};

use crate::{application::ProductInput, error::ApiError, extract::AppJson, models::ProductRequest};

pub const MAX_FILES: usize = 5;
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Body limit for product routes: every image at full size plus the text fields
pub const MAX_PRODUCT_BODY_BYTES: usize = MAX_FILES * MAX_FILE_BYTES + 1024 * 1024;

const IMAGE_FIELD: &str = "images";

/// Accepted MIME types and the extensions each may carry
const ALLOWED_TYPES: &[(&str, &[&str])] = &[
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/png", &["png"]),
    ("image/gif", &["gif"]),
    ("image/webp", &["webp"]),
];

pub fn file_too_large() -> ApiError {
    ApiError::bad_request("FILE_TOO_LARGE", "File size exceeds 5MB limit")
}

pub fn too_many_files() -> ApiError {
    ApiError::bad_request("TOO_MANY_FILES", "Too many files. Maximum 5 files allowed")
}

/// Check an image's type, extension and size
pub fn validate_image(file_name: &str, content_type: &str, size: usize) -> Result<(), ApiError> {
    let content_type = content_type.trim().to_ascii_lowercase();
    let Some((_, extensions)) = ALLOWED_TYPES.iter().find(|(mime, _)| *mime == content_type)
    else {
        return Err(ApiError::bad_request(
            "UPLOAD_ERROR",
            "Only image files are allowed (JPEG, PNG, GIF, WebP)",
        ));
    };

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !extensions.contains(&extension.as_str()) {
        return Err(ApiError::bad_request(
            "UPLOAD_ERROR",
            "File extension does not match file type",
        ));
    }

    if size > MAX_FILE_BYTES {
        return Err(file_too_large());
    }
    Ok(())
}

/// A product create/update request with any uploaded images
#[derive(Debug, Default)]
pub struct ProductForm {
    pub input: ProductInput,
    pub images: Vec<ImageUpload>,
}

#[axum::async_trait]
impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request("UPLOAD_ERROR", e.body_text()))?;
            read_multipart(multipart).await
        } else {
            let AppJson(body) = AppJson::<ProductRequest>::from_request(req, state).await?;
            Ok(ProductForm {
                input: body.into(),
                images: Vec::new(),
            })
        }
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return file_too_large();
    }
    ApiError::new(status, "UPLOAD_ERROR", err.body_text())
}

async fn read_multipart(mut multipart: Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();
    let mut tag_values: Option<Vec<String>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD || field.file_name().is_some() {
            if let Some(image) = read_image(field).await? {
                if form.images.len() == MAX_FILES {
                    return Err(too_many_files());
                }
                form.images.push(image);
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        let input = &mut form.input;
        match name.trim_end_matches("[]") {
            "title" => input.title = Some(value),
            "description" => input.description = Some(value),
            "category" => input.category = Some(value),
            "price" => match value.trim().parse::<f64>() {
                Ok(price) => input.price = Some(price),
                Err(_) if value.trim().is_empty() => {}
                Err(_) => input.invalid.push("Price must be a number".to_string()),
            },
            "stock" => match value.trim().parse::<i32>() {
                Ok(stock) => input.stock = Some(stock),
                Err(_) if value.trim().is_empty() => {}
                Err(_) => input.invalid.push("Stock must be a whole number".to_string()),
            },
            "isActive" => match value.trim() {
                "true" => input.is_active = Some(true),
                "false" => input.is_active = Some(false),
                _ => input.invalid.push("isActive must be true or false".to_string()),
            },
            "sustainabilityTags" => tag_values.get_or_insert_with(Vec::new).push(value),
            other => tracing::debug!("Ignoring unknown product form field: {}", other),
        }
    }

    if let Some(values) = tag_values {
        let mut tags = Vec::new();
        for tag in values.iter().flat_map(|v| parse_tags(v)) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        form.input.sustainability_tags = Some(tags);
    }

    if !form.images.is_empty() {
        let total_bytes: usize = form.images.iter().map(ImageUpload::size).sum();
        tracing::info!(
            target: "greencart::upload",
            files = form.images.len(),
            total_bytes,
            "Product images received"
        );
    }

    Ok(form)
}

/// Empty file parts (a form submitted without choosing a file) yield `None`
async fn read_image(field: Field<'_>) -> Result<Option<ImageUpload>, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }

    if let Err(err) = validate_image(&file_name, &content_type, bytes.len()) {
        tracing::warn!(
            target: "greencart::upload",
            file_name = %file_name,
            content_type = %content_type,
            size = bytes.len(),
            "Rejected upload: {}",
            err.message
        );
        return Err(err);
    }

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use greencart::SustainabilityTag;

    use crate::test_support::{multipart_body, multipart_content_type, Part};

    fn multipart_request(parts: &[Part<'_>]) -> Request {
        Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::CONTENT_TYPE, multipart_content_type())
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    #[test]
    fn test_validate_image_rules() {
        assert!(validate_image("photo.JPG", "image/jpeg", 10).is_ok());
        assert!(validate_image("photo.jpeg", "image/jpeg", 10).is_ok());
        assert!(validate_image("photo.webp", "image/webp", 10).is_ok());

        let err = validate_image("photo.png", "image/jpeg", 10).unwrap_err();
        assert_eq!(err.message, "File extension does not match file type");

        let err = validate_image("doc.pdf", "application/pdf", 10).unwrap_err();
        assert_eq!(err.code, "UPLOAD_ERROR");

        let err = validate_image("big.png", "image/png", MAX_FILE_BYTES + 1).unwrap_err();
        assert_eq!(err.code, "FILE_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_multipart_form_fields_and_images() {
        let req = multipart_request(&[
            Part::Text("title", "Bamboo Toothbrush"),
            Part::Text("description", "Biodegradable"),
            Part::Text("price", "4.50"),
            Part::Text("stock", "12"),
            Part::Text("sustainabilityTags", "[\"recycled\",\"handmade\"]"),
            Part::Text("sustainabilityTags", "organic"),
            Part::File("brush.png", "image/png", b"\x89PNG fake"),
        ]);

        let form = ProductForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.input.title.as_deref(), Some("Bamboo Toothbrush"));
        assert_eq!(form.input.price, Some(4.5));
        assert_eq!(form.input.stock, Some(12));
        assert_eq!(
            form.input.sustainability_tags,
            Some(vec![
                SustainabilityTag::Recycled,
                SustainabilityTag::Handmade,
                SustainabilityTag::Organic
            ])
        );
        assert!(form.input.invalid.is_empty());
        assert_eq!(form.images.len(), 1);
        assert_eq!(form.images[0].content_type, "image/png");
    }

    #[tokio::test]
    async fn test_multipart_rejects_sixth_image() {
        let parts: Vec<Part<'_>> = (0..6)
            .map(|_| Part::File("a.gif", "image/gif", b"GIF89a"))
            .collect();

        let err = ProductForm::from_request(multipart_request(&parts), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, "TOO_MANY_FILES");
    }

    #[tokio::test]
    async fn test_multipart_rejects_mismatched_extension() {
        let req = multipart_request(&[Part::File("shell.php", "image/png", b"<?php")]);
        let err = ProductForm::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.code, "UPLOAD_ERROR");
    }

    #[tokio::test]
    async fn test_multipart_unparsable_price_is_reported() {
        let req = multipart_request(&[Part::Text("title", "Mug"), Part::Text("price", "cheap")]);
        let form = ProductForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.input.price, None);
        assert_eq!(form.input.invalid, vec!["Price must be a number"]);
    }

    #[tokio::test]
    async fn test_json_body_is_accepted() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"title":"Jar","description":"Glass","price":3,"sustainabilityTags":"recycled"}"#,
            ))
            .unwrap();

        let form = ProductForm::from_request(req, &()).await.unwrap();
        assert_eq!(form.input.price, Some(3.0));
        assert_eq!(
            form.input.sustainability_tags,
            Some(vec![SustainabilityTag::Recycled])
        );
        assert!(form.images.is_empty());
    }
}
