//! Default permission oracle: the entity's configured operations list.

use crate::config::EntityDefinition;
use crate::error::AppError;
use crate::service::PermissionOracle;
use async_trait::async_trait;

/// Answers from `EntityConfig::operations` (`create`, `read`, `update`). Row-level
/// visibility is enforced separately when the record is fetched.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityOperationsOracle;

#[async_trait]
impl PermissionOracle for EntityOperationsOracle {
    async fn can_create(&self, _user: &str, entity: &EntityDefinition) -> Result<bool, AppError> {
        Ok(entity.allows("create"))
    }

    async fn can_read(&self, _user: &str, entity: &EntityDefinition, _record: &str) -> Result<bool, AppError> {
        Ok(entity.allows("read"))
    }

    async fn can_update(&self, _user: &str, entity: &EntityDefinition, _record: &str) -> Result<bool, AppError> {
        Ok(entity.allows("update"))
    }
}
