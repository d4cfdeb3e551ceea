//! Render Request Parsing
//!
//! Converts a multipart/form-data HTTP body into a validated [`RenderRequest`].
//!
//! The field table below is the schema: one entry per recognized form field,
//! naming its declared [`FieldType`](super::field::FieldType) and whether it
//! is unconditionally required. `min_depth`/`max_depth` are the one exception
//! — required only when `image_type=depth` — and are checked after the table
//! pass (see [`RenderRequest::validate_depth_fields`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use chrono::Local;

use crate::errors::{Result, ServerError};
use super::field::{FieldType, FieldValue};

/// The kind of image a request asks the renderer to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Color,
    Depth,
    Label,
}

impl ImageType {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "color" => Some(ImageType::Color),
            "depth" => Some(ImageType::Depth),
            "label" => Some(ImageType::Label),
            _ => None,
        }
    }
}

/// A single declared form field: its name and its semantic type.
struct FieldSpec {
    name: &'static str,
    ty: FieldType,
    /// `true` for fields required on every request. `min_depth`/`max_depth`
    /// are deliberately absent from this unconditional set; see module docs.
    required: bool,
}

const IMAGE_TYPE_CHOICES: &[&str] = &["color", "depth", "label"];

/// The declarative schema: one entry per recognized form field (excluding
/// the `scene` file part, which is handled separately since it is a file,
/// not a text value).
const FIELD_TABLE: &[FieldSpec] = &[
    FieldSpec { name: "scene_sha256", ty: FieldType::Str, required: true },
    FieldSpec { name: "image_type", ty: FieldType::Literal(IMAGE_TYPE_CHOICES), required: true },
    FieldSpec { name: "width", ty: FieldType::PositiveInt, required: true },
    FieldSpec { name: "height", ty: FieldType::PositiveInt, required: true },
    FieldSpec { name: "near", ty: FieldType::PositiveFloat, required: true },
    FieldSpec { name: "far", ty: FieldType::PositiveFloat, required: true },
    FieldSpec { name: "focal_x", ty: FieldType::PositiveFloat, required: true },
    FieldSpec { name: "focal_y", ty: FieldType::PositiveFloat, required: true },
    FieldSpec { name: "fov_x", ty: FieldType::PositiveFloat, required: true },
    FieldSpec { name: "fov_y", ty: FieldType::PositiveFloat, required: true },
    FieldSpec { name: "center_x", ty: FieldType::FiniteFloat, required: true },
    FieldSpec { name: "center_y", ty: FieldType::FiniteFloat, required: true },
    FieldSpec { name: "min_depth", ty: FieldType::PositiveFloat, required: false },
    FieldSpec { name: "max_depth", ty: FieldType::PositiveFloat, required: false },
];

/// A field name that is always ignored, regardless of the schema.
const IGNORED_FIELD: &str = "submit";
/// The name of the multipart file part carrying the glTF scene.
const SCENE_FIELD: &str = "scene";

/// A fully validated, immutable render request, per §3 of the protocol.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub scene: PathBuf,
    pub scene_sha256: String,
    pub image_type: ImageType,
    pub width: u32,
    pub height: u32,
    pub near: f64,
    pub far: f64,
    pub focal_x: f64,
    pub focal_y: f64,
    pub fov_x: f64,
    pub fov_y: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
}

impl RenderRequest {
    /// Parses and validates a multipart body, persisting the `scene` file
    /// part into `temp_dir` under a timestamped name.
    pub async fn from_multipart(mut multipart: Multipart, temp_dir: &Path) -> Result<Self> {
        let mut values: HashMap<&'static str, FieldValue> = HashMap::new();
        let mut scene_path: Option<PathBuf> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::MultipartError(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == IGNORED_FIELD {
                continue;
            }

            if name == SCENE_FIELD {
                if scene_path.is_some() {
                    return Err(ServerError::ScenePartMissing(
                        "more than one 'scene' file part was provided".to_string(),
                    ));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::MultipartError(e.to_string()))?;
                scene_path = Some(persist_scene_file(temp_dir, &bytes)?);
                continue;
            }

            let Some(spec) = FIELD_TABLE.iter().find(|f| f.name == name) else {
                return Err(ServerError::UnknownField(name));
            };
            let text = field
                .text()
                .await
                .map_err(|e| ServerError::MultipartError(e.to_string()))?;
            let value = spec.ty.coerce(spec.name, &text)?;
            values.insert(spec.name, value);
        }

        for spec in FIELD_TABLE.iter().filter(|f| f.required) {
            if !values.contains_key(spec.name) {
                return Err(ServerError::MissingField(spec.name.to_string()));
            }
        }

        let scene = scene_path.ok_or_else(|| {
            ServerError::ScenePartMissing("no 'scene' file part was provided".to_string())
        })?;

        Self::from_values(scene, &values)
    }

    fn from_values(scene: PathBuf, values: &HashMap<&'static str, FieldValue>) -> Result<Self> {
        let get_str = |name: &str| -> Result<String> {
            values
                .get(name)
                .and_then(FieldValue::as_str)
                .map(str::to_string)
                .ok_or_else(|| ServerError::MissingField(name.to_string()))
        };
        let get_u32 = |name: &str| -> Result<u32> {
            values
                .get(name)
                .and_then(FieldValue::as_u32)
                .ok_or_else(|| ServerError::MissingField(name.to_string()))
        };
        let get_f64 = |name: &str| -> Result<f64> {
            values
                .get(name)
                .and_then(FieldValue::as_f64)
                .ok_or_else(|| ServerError::MissingField(name.to_string()))
        };

        let image_type_raw = get_str("image_type")?;
        let image_type = ImageType::parse(&image_type_raw).ok_or_else(|| {
            ServerError::InvalidField {
                field: "image_type".to_string(),
                reason: format!("'{image_type_raw}' is not one of {IMAGE_TYPE_CHOICES:?}"),
            }
        })?;

        let near = get_f64("near")?;
        let far = get_f64("far")?;
        if near >= far {
            return Err(ServerError::InvalidField {
                field: "near".to_string(),
                reason: format!("near ({near}) must be strictly less than far ({far})"),
            });
        }

        let min_depth = values.get("min_depth").and_then(FieldValue::as_f64);
        let max_depth = values.get("max_depth").and_then(FieldValue::as_f64);
        Self::validate_depth_fields(image_type, min_depth, max_depth)?;

        Ok(RenderRequest {
            scene,
            scene_sha256: get_str("scene_sha256")?,
            image_type,
            width: get_u32("width")?,
            height: get_u32("height")?,
            near,
            far,
            focal_x: get_f64("focal_x")?,
            focal_y: get_f64("focal_y")?,
            fov_x: get_f64("fov_x")?,
            fov_y: get_f64("fov_y")?,
            center_x: get_f64("center_x")?,
            center_y: get_f64("center_y")?,
            min_depth,
            max_depth,
        })
    }

    /// `min_depth`/`max_depth` are required iff `image_type == depth`, and
    /// must additionally satisfy `0 < min_depth < max_depth` and
    /// `max_depth * 1000 <= 65535` (the 16-bit millimeter ceiling).
    fn validate_depth_fields(
        image_type: ImageType,
        min_depth: Option<f64>,
        max_depth: Option<f64>,
    ) -> Result<()> {
        if image_type != ImageType::Depth {
            return Ok(());
        }
        let min_depth = min_depth.ok_or_else(|| ServerError::MissingField("min_depth".to_string()))?;
        let max_depth = max_depth.ok_or_else(|| ServerError::MissingField("max_depth".to_string()))?;
        if min_depth >= max_depth {
            return Err(ServerError::InvalidField {
                field: "min_depth".to_string(),
                reason: format!(
                    "min_depth ({min_depth}) must be strictly less than max_depth ({max_depth})"
                ),
            });
        }
        const U16_MAX: f64 = 65535.0;
        if max_depth * 1000.0 > U16_MAX {
            return Err(ServerError::InvalidField {
                field: "max_depth".to_string(),
                reason: format!(
                    "max_depth ({max_depth}) overflows a 16-bit millimeter depth image"
                ),
            });
        }
        Ok(())
    }

    /// The path the rendered PNG will be written to: `scene` with its
    /// extension replaced by `.png`.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.scene.with_extension("png")
    }
}

/// Writes an uploaded glTF part into `temp_dir` under a timestamped name of
/// the form `YYYY-MM-DD_HH-MM-SS-uuuuuu.gltf`, where the trailing component
/// is the current microsecond-of-second, zero-padded to six digits.
fn persist_scene_file(temp_dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S-%6f");
    let path = temp_dir.join(format!("{stamp}.gltf"));
    std::fs::write(&path, bytes)?;
    Ok(path)
}
