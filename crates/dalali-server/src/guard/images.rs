use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::retry::retry_transient_once;
use super::GuardError;
use crate::auth::{Actor, Owned};
use crate::models::{PropertyImage, IMAGE_COLUMNS};

/// Image metadata to attach to a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImage {
    pub image_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub is_primary: bool,
}

struct PropertyOwner(Uuid);

impl Owned for PropertyOwner {
    fn owner_id(&self) -> Uuid {
        self.0
    }
}

/// Locks the property row and checks that `actor` may manage it.
async fn lock_for_manager(
    conn: &mut PgConnection,
    actor: &Actor,
    property_id: Uuid,
) -> Result<(), GuardError> {
    let seller_id: Uuid =
        sqlx::query_scalar("SELECT seller_id FROM properties WHERE id = $1 FOR UPDATE")
            .bind(property_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| GuardError::property_not_found(property_id))?;

    if !actor.can_manage(&PropertyOwner(seller_id)) {
        return Err(GuardError::Permission(
            "Only the property's seller can manage its images".to_string(),
        ));
    }
    Ok(())
}

async fn clear_primary(
    conn: &mut PgConnection,
    property_id: Uuid,
    keep: Option<Uuid>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE property_images SET is_primary = false \
         WHERE property_id = $1 AND is_primary AND id IS DISTINCT FROM $2",
    )
    .bind(property_id)
    .bind(keep)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Make `image_id` the only primary image of `property_id`.
///
/// Runs in one transaction under the property row lock. The previous primary
/// is cleared before the new one is set so the one-primary index never sees
/// two rows at once.
#[tracing::instrument(skip(pool), fields(user_id = %actor.user_id))]
pub async fn set_primary_image(
    pool: &PgPool,
    actor: Actor,
    property_id: Uuid,
    image_id: Uuid,
) -> Result<PropertyImage, GuardError> {
    let image = retry_transient_once("change the primary image", move || {
        set_primary_once(pool, actor, property_id, image_id)
    })
    .await?;

    tracing::info!(%property_id, %image_id, "Primary image changed");
    Ok(image)
}

async fn set_primary_once(
    pool: &PgPool,
    actor: Actor,
    property_id: Uuid,
    image_id: Uuid,
) -> Result<PropertyImage, GuardError> {
    let mut tx = pool.begin().await?;

    lock_for_manager(&mut *tx, &actor, property_id).await?;

    let belongs: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM property_images WHERE id = $1 AND property_id = $2)",
    )
    .bind(image_id)
    .bind(property_id)
    .fetch_one(&mut *tx)
    .await?;
    if !belongs {
        return Err(GuardError::NotFound(format!(
            "Image '{}' not found for property '{}'",
            image_id, property_id
        )));
    }

    clear_primary(&mut *tx, property_id, Some(image_id)).await?;

    let sql = format!(
        "UPDATE property_images SET is_primary = true WHERE id = $1 RETURNING {}",
        IMAGE_COLUMNS
    );
    let image = sqlx::query_as::<_, PropertyImage>(&sql)
        .bind(image_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(image)
}

/// Attach an image to a listing. A new primary image demotes the old one in
/// the same transaction.
#[tracing::instrument(skip(pool, image), fields(user_id = %actor.user_id))]
pub async fn add_image(
    pool: &PgPool,
    actor: Actor,
    property_id: Uuid,
    image: NewImage,
) -> Result<PropertyImage, GuardError> {
    if image.image_url.trim().is_empty() {
        return Err(GuardError::Validation("image_url is required".to_string()));
    }

    let image = &image;
    let created = retry_transient_once("add the image", move || {
        add_once(pool, actor, property_id, image)
    })
    .await?;

    tracing::info!(%property_id, image_id = %created.id, "Image added");
    Ok(created)
}

async fn add_once(
    pool: &PgPool,
    actor: Actor,
    property_id: Uuid,
    image: &NewImage,
) -> Result<PropertyImage, GuardError> {
    let mut tx = pool.begin().await?;

    lock_for_manager(&mut *tx, &actor, property_id).await?;

    if image.is_primary {
        clear_primary(&mut *tx, property_id, None).await?;
    }

    let sql = format!(
        "INSERT INTO property_images (property_id, image_url, caption, is_primary) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        IMAGE_COLUMNS
    );
    let created = sqlx::query_as::<_, PropertyImage>(&sql)
        .bind(property_id)
        .bind(image.image_url.trim())
        .bind(&image.caption)
        .bind(image.is_primary)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(created)
}

/// Remove an image from a listing.
#[tracing::instrument(skip(pool), fields(user_id = %actor.user_id))]
pub async fn remove_image(
    pool: &PgPool,
    actor: Actor,
    property_id: Uuid,
    image_id: Uuid,
) -> Result<(), GuardError> {
    retry_transient_once("remove the image", move || {
        remove_once(pool, actor, property_id, image_id)
    })
    .await?;

    tracing::info!(%property_id, %image_id, "Image removed");
    Ok(())
}

async fn remove_once(
    pool: &PgPool,
    actor: Actor,
    property_id: Uuid,
    image_id: Uuid,
) -> Result<(), GuardError> {
    let mut tx = pool.begin().await?;

    lock_for_manager(&mut *tx, &actor, property_id).await?;

    let deleted = sqlx::query("DELETE FROM property_images WHERE id = $1 AND property_id = $2")
        .bind(image_id)
        .bind(property_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(GuardError::NotFound(format!(
            "Image '{}' not found for property '{}'",
            image_id, property_id
        )));
    }

    tx.commit().await?;
    Ok(())
}
