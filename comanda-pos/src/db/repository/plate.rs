//! Plate Repository

use std::sync::Arc;

use shared::Plate;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{Collection, DocumentStore};

#[derive(Clone)]
pub struct PlateRepository {
    base: BaseRepository,
}

impl PlateRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Plates),
        }
    }

    /// Menu sorted by name
    pub async fn find_all(&self) -> RepoResult<Vec<Plate>> {
        let mut plates: Vec<Plate> = self
            .base
            .list_as::<Plate>()
            .await?
            .into_iter()
            .map(|(id, plate)| Plate { id, ..plate })
            .collect();
        plates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(plates)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Plate>> {
        Ok(self
            .base
            .get_as::<Plate>(id)
            .await?
            .map(|plate| Plate { id: id.to_string(), ..plate }))
    }

    pub async fn create(&self, plate: Plate) -> RepoResult<Plate> {
        validate(&plate)?;
        let id = self.base.create_from(&plate).await?;
        Ok(Plate { id, ..plate })
    }

    /// Full replace of an existing plate
    pub async fn replace(&self, id: &str, plate: Plate) -> RepoResult<Plate> {
        validate(&plate)?;
        if self.base.get_as::<Plate>(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Plate {} not found", id)));
        }
        self.base.put_from(id, &plate).await?;
        Ok(Plate { id: id.to_string(), ..plate })
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.base.delete(id).await
    }
}

fn validate(plate: &Plate) -> RepoResult<()> {
    if plate.name.trim().is_empty() {
        return Err(RepoError::Validation("plate name is required".into()));
    }
    if !plate.price.is_finite() || plate.price < 0.0 {
        return Err(RepoError::Validation(format!(
            "plate price must be a non-negative number, got {}",
            plate.price
        )));
    }
    Ok(())
}
