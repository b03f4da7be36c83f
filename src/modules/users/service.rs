use anyhow::anyhow;
use edugate_core::{AppError, ErrorKind, PaginationParams, hash_password_with_cost, verify_password};
use edugate_db::Database;
use edugate_models::{ChangePasswordDto, PaginatedUsersResponse, UpdateProfileDto, User};
use tracing::instrument;
use uuid::Uuid;

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &dyn Database, user_id: Uuid) -> Result<User, AppError> {
        db.find_user_by_id(user_id)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::not_found("User not found".to_string()))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &dyn Database,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        db.update_profile(user_id, &dto)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::not_found("User not found".to_string()))
    }

    /// Requires the current password even though the caller holds a valid
    /// token.
    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &dyn Database,
        user_id: Uuid,
        dto: ChangePasswordDto,
        bcrypt_cost: u32,
    ) -> Result<(), AppError> {
        let user = db
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

        if !verify_password(&dto.current_password, &user.password_hash)? {
            return Err(AppError::new(
                ErrorKind::Authentication,
                anyhow!("Current password is incorrect"),
            ));
        }

        let password_hash = hash_password_with_cost(&dto.new_password, bcrypt_cost)?;
        db.update_password(user_id, &password_hash).await?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_users(
        db: &dyn Database,
        params: PaginationParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let (users, total) = db.list_users(params.limit(), params.offset()).await?;

        Ok(PaginatedUsersResponse {
            data: users.into_iter().map(User::from).collect(),
            meta: params.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_user(
        db: &dyn Database,
        user_id: Uuid,
        acting_user_id: Uuid,
    ) -> Result<(), AppError> {
        if user_id == acting_user_id {
            return Err(AppError::bad_request(anyhow!(
                "Cannot delete your own account"
            )));
        }

        if !db.delete_user(user_id).await? {
            return Err(AppError::not_found("User not found".to_string()));
        }

        tracing::info!(user_id = %user_id, deleted_by = %acting_user_id, "user deleted");
        Ok(())
    }
}
