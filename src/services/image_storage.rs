use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
const PROFILE_IMAGES_DIR: &str = "profile_images";

/// Almacén de imágenes de perfil en disco: `<upload_dir>/profile_images/<uuid>.<ext>`
#[derive(Debug, Clone)]
pub struct ProfileImageStore {
    dir: PathBuf,
}

impl ProfileImageStore {
    pub fn new(upload_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: upload_dir.as_ref().join(PROFILE_IMAGES_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Guarda la imagen y devuelve el nombre generado
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::ValidationError("Uploaded image is empty".to_string()));
        }
        let extension = allowed_extension(original_name)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        tracing::info!("🖼️ Imagen de perfil guardada: {} ({} bytes)", filename, bytes.len());
        Ok(filename)
    }

    pub async fn remove(&self, filename: &str) -> AppResult<()> {
        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn allowed_extension(original_name: &str) -> AppResult<String> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AppError::ValidationError(format!(
            "Unsupported image type '{}', expected one of {}",
            original_name,
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> ProfileImageStore {
        ProfileImageStore::new(std::env::temp_dir().join(format!("uploads-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_allowed_extensions() {
        assert_eq!(allowed_extension("avatar.PNG").unwrap(), "png");
        assert_eq!(allowed_extension("photo.jpeg").unwrap(), "jpeg");
        assert!(allowed_extension("script.sh").is_err());
        assert!(allowed_extension("noextension").is_err());
    }

    #[tokio::test]
    async fn test_save_writes_uuid_named_file() {
        let store = temp_store();
        let filename = store.save("me.webp", b"RIFF....WEBP").await.unwrap();

        assert!(filename.ends_with(".webp"));
        let written = tokio::fs::read(store.dir().join(&filename)).await.unwrap();
        assert_eq!(written, b"RIFF....WEBP");

        store.remove(&filename).await.unwrap();
        store.remove(&filename).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let store = temp_store();
        let result = store.save("me.png", &[]).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
