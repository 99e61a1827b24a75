use std::sync::Arc;

use domain::{
    parse_birth_date, DomainError, NewUser, PersonName, RepositoryError, User, UserAlias,
    UserEmail, UserId, UserProfile, MIN_PASSWORD_LENGTH,
};

use crate::{
    clock::Clock,
    dto::{AuthenticateUserRequest, RegisterUserRequest},
    error::ApplicationError,
    password::PasswordHasher,
    repository::UserRepository,
};

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, ApplicationError> {
        let email = UserEmail::parse(request.email)?;
        let alias = UserAlias::parse(request.alias)?;
        let first_name = PersonName::parse("firstName", request.first_name)?;
        let last_name = PersonName::parse("lastName", request.last_name)?;
        let birth_date = parse_birth_date(&request.birth_date)?;
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::invalid_argument(
                "password",
                format!("debe tener al menos {MIN_PASSWORD_LENGTH} caracteres"),
            )
            .into());
        }

        if self
            .deps
            .user_repository
            .exists_by_email_or_alias(&email, &alias)
            .await?
        {
            return Err(DomainError::UserAlreadyExists.into());
        }

        let password = self.deps.password_hasher.hash(&request.password).await?;
        let user = NewUser {
            email,
            password,
            first_name,
            last_name,
            alias,
            birth_date,
            created_at: self.deps.clock.now(),
        };

        // A concurrent registration can still win the unique index.
        let stored = match self.deps.user_repository.create(user).await {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(DomainError::UserAlreadyExists.into()),
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user_id = %stored.id, alias = %stored.alias, "user registered");
        Ok(stored)
    }

    pub async fn authenticate(
        &self,
        request: AuthenticateUserRequest,
    ) -> Result<User, ApplicationError> {
        let email = UserEmail::parse(request.email).map_err(|_| ApplicationError::Authentication)?;
        let user = self
            .deps
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(ApplicationError::Authentication)?;

        let password_ok = self
            .deps
            .password_hasher
            .verify(&request.password, &user.password)
            .await?;
        if !password_ok {
            return Err(ApplicationError::Authentication);
        }

        tracing::debug!(user_id = %user.id, "user authenticated");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<UserProfile, ApplicationError> {
        tracing::debug!(user_id = %id, "looking up user");
        let user = self
            .deps
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        Ok(user.profile())
    }

    /// Unknown and empty aliases both resolve to `UserNotFound`.
    pub async fn find_by_alias(&self, alias: &str) -> Result<UserProfile, ApplicationError> {
        let Ok(alias) = UserAlias::parse(alias) else {
            return Err(DomainError::UserNotFound.into());
        };
        tracing::debug!(alias = %alias, "looking up user by alias");
        let user = self
            .deps
            .user_repository
            .find_by_alias(&alias)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        Ok(user.profile())
    }

    pub async fn get_profile(&self, id: UserId) -> Result<UserProfile, ApplicationError> {
        self.find_by_id(id).await
    }
}
