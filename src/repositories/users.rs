use async_trait::async_trait;
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{debug, instrument, trace};

use super::{RepositoryError, UserRepository};
use crate::domain::User;

#[derive(Clone, Debug)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn describe_user_conflict(detail: &str) -> String {
    let detail = detail.to_lowercase();
    if detail.contains("email") {
        "email already exists".to_string()
    } else if detail.contains("username") {
        "username already exists".to_string()
    } else {
        "email or username already exists".to_string()
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        trace!("Inserting user row");
        let row = user::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
        };

        let model = row
            .insert(&self.db)
            .await
            .map_err(|e| RepositoryError::from_write(e, describe_user_conflict))?;
        debug!("User row inserted");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use uuid::Uuid;

    fn user(email: &str, username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "$2b$04$placeholder".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repo = SeaOrmUserRepository::new(setup_test_db().await);
        let trinity = user("trinity@example.com", "trinity");

        let created = repo.create(&trinity).await.unwrap();
        assert_eq!(created, trinity);

        let found = repo.find_by_email("trinity@example.com").await.unwrap();
        assert_eq!(found, Some(trinity));
        assert_eq!(repo.find_by_email("nobody@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(setup_test_db().await);
        repo.create(&user("dup@example.com", "first")).await.unwrap();

        let result = repo.create(&user("dup@example.com", "second")).await;

        match result {
            Err(RepositoryError::Conflict(detail)) => assert_eq!(detail, "email already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(setup_test_db().await);
        repo.create(&user("one@example.com", "morpheus")).await.unwrap();

        let result = repo.create(&user("two@example.com", "morpheus")).await;

        match result {
            Err(RepositoryError::Conflict(detail)) => assert_eq!(detail, "username already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_user_conflict() {
        assert_eq!(
            describe_user_conflict("UNIQUE constraint failed: users.email"),
            "email already exists"
        );
        assert_eq!(
            describe_user_conflict("duplicate key value violates unique constraint \"users_username_key\""),
            "username already exists"
        );
        assert_eq!(describe_user_conflict("whatever"), "email or username already exists");
    }
}
