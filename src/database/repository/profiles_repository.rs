//! Profile repository
//!
//! Profiles are stored as joined tables: every write that touches a role row runs in one
//! transaction with the matching `profiles` write.

use std::collections::HashMap;

use crate::database::dto::{Account, InsertProfileData, NewRole, Role, UpdateProfileData};
use crate::entity::prelude::*;
use crate::entity::{admins, profiles, users};
use sea_orm::*;

/// Profile data repository
pub struct ProfilesRepository;

impl ProfilesRepository {
    // ==================== Profile CRUD ====================

    /// Inserts the profile row and its role row
    pub async fn insert(
        db: &DatabaseConnection,
        data: InsertProfileData,
    ) -> Result<Account, DbErr> {
        let now = chrono::Utc::now().timestamp();
        let txn = db.begin().await?;

        let profile = profiles::ActiveModel {
            id: NotSet,
            username: Set(data.username),
            password_hash: Set(data.password_hash),
            email: Set(data.email),
            name: Set(data.name),
            surname: Set(data.surname),
            telephone: Set(data.telephone),
            kind: Set(data.role.kind()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await?;

        let role = match data.role {
            NewRole::User {
                gender,
                card_number,
            } => Role::User(
                users::ActiveModel {
                    profile_id: Set(profile.id),
                    gender: Set(gender),
                    card_number: Set(card_number),
                }
                .insert(&txn)
                .await?,
            ),
            NewRole::Admin { current_account } => Role::Admin(
                admins::ActiveModel {
                    profile_id: Set(profile.id),
                    current_account: Set(current_account),
                }
                .insert(&txn)
                .await?,
            ),
        };

        txn.commit().await?;
        Ok(Account { profile, role })
    }

    /// Looks up an account by id
    pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Account>, DbErr> {
        match Profiles::find_by_id(id).one(db).await? {
            Some(profile) => Self::load_role(db, profile).await.map(Some),
            None => Ok(None),
        }
    }

    /// Looks up an account by username (exact match)
    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Account>, DbErr> {
        let profile = Profiles::find()
            .filter(profiles::Column::Username.eq(username))
            .one(db)
            .await?;
        match profile {
            Some(profile) => Self::load_role(db, profile).await.map(Some),
            None => Ok(None),
        }
    }

    /// Every account, ordered by username
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Account>, DbErr> {
        let profiles = Profiles::find()
            .order_by_asc(profiles::Column::Username)
            .all(db)
            .await?;
        let mut users: HashMap<i32, users::Model> = Users::find()
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.profile_id, u))
            .collect();
        let mut admins: HashMap<i32, admins::Model> = Admins::find()
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.profile_id, a))
            .collect();

        Ok(profiles
            .into_iter()
            .filter_map(|profile| {
                let role = match profile.kind {
                    ProfileKind::User => users.remove(&profile.id).map(Role::User),
                    ProfileKind::Admin => admins.remove(&profile.id).map(Role::Admin),
                };
                if role.is_none() {
                    log::warn!("profile {} has no {:?} row", profile.id, profile.kind);
                }
                role.map(|role| Account { profile, role })
            })
            .collect())
    }

    /// Applies a partial edit to the profile and its role row
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        updates: UpdateProfileData,
    ) -> Result<Account, DbErr> {
        let txn = db.begin().await?;

        let existing = Profiles::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;
        let kind = existing.kind;

        let mut active: profiles::ActiveModel = existing.into();
        if let Some(email) = updates.email {
            active.email = Set(email);
        }
        if let Some(name) = updates.name {
            active.name = Set(name);
        }
        if let Some(surname) = updates.surname {
            active.surname = Set(surname);
        }
        if let Some(telephone) = updates.telephone {
            active.telephone = Set(telephone);
        }
        active.updated_at = Set(Some(chrono::Utc::now().timestamp()));
        let profile = active.update(&txn).await?;

        match kind {
            ProfileKind::User if updates.gender.is_some() || updates.card_number.is_some() => {
                let user = users::ActiveModel {
                    profile_id: Set(id),
                    gender: updates.gender.map_or(NotSet, Set),
                    card_number: updates.card_number.map_or(NotSet, Set),
                };
                user.update(&txn).await?;
            }
            ProfileKind::Admin if updates.current_account.is_some() => {
                let admin = admins::ActiveModel {
                    profile_id: Set(id),
                    current_account: updates.current_account.map_or(NotSet, Set),
                };
                admin.update(&txn).await?;
            }
            _ => {}
        }

        let account = Self::load_role(&txn, profile).await?;
        txn.commit().await?;
        Ok(account)
    }

    /// Replaces the stored password hash
    pub async fn update_password(
        db: &DatabaseConnection,
        id: i32,
        password_hash: String,
    ) -> Result<(), DbErr> {
        let profile = profiles::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash),
            updated_at: Set(Some(chrono::Utc::now().timestamp())),
            ..Default::default()
        };
        profile.update(db).await?;
        Ok(())
    }

    /// Deletes a profile; role rows, orders and reviews go with it (ON DELETE CASCADE)
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
        Profiles::delete_by_id(id).exec(db).await
    }

    // ==================== Uniqueness checks ====================

    /// Whether `username` is taken by a profile other than `except_id`
    pub async fn username_exists(
        db: &DatabaseConnection,
        username: &str,
        except_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = Profiles::find().filter(profiles::Column::Username.eq(username));
        if let Some(id) = except_id {
            query = query.filter(profiles::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    /// Whether `email` is taken by a profile other than `except_id`
    pub async fn email_exists(
        db: &DatabaseConnection,
        email: &str,
        except_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = Profiles::find().filter(profiles::Column::Email.eq(email));
        if let Some(id) = except_id {
            query = query.filter(profiles::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    /// Number of administrator profiles
    pub async fn count_admins(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Profiles::find()
            .filter(profiles::Column::Kind.eq(ProfileKind::Admin))
            .count(db)
            .await
    }

    // ==================== Private helpers ====================

    /// Joins the role row matching `profile.kind`
    async fn load_role<C>(conn: &C, profile: profiles::Model) -> Result<Account, DbErr>
    where
        C: ConnectionTrait,
    {
        let role = match profile.kind {
            ProfileKind::User => Role::User(
                Users::find_by_id(profile.id)
                    .one(conn)
                    .await?
                    .ok_or(DbErr::RecordNotFound("User row not found".to_string()))?,
            ),
            ProfileKind::Admin => Role::Admin(
                Admins::find_by_id(profile.id)
                    .one(conn)
                    .await?
                    .ok_or(DbErr::RecordNotFound("Admin row not found".to_string()))?,
            ),
        };
        Ok(Account { profile, role })
    }
}
