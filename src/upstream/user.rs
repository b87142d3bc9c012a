use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{
    user::MemberKind, Id, Member, Page, PasswordReset, Profile, Role, Session,
};

use super::{Client, Error, Filters};

/// Sent as the password on admin profile updates. The upstream update
/// schema requires one but only applies the nickname and phone.
pub const UNCHANGED_PASSWORD: &str = "dummy123";

/// Account as submitted at sign-up.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_id: String,
    pub password: String,
    pub nickname: String,
    pub contact_phone: String,
    pub role: Role,
}

/// Fields users may change on their own profile.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub nickname: String,
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Fields an administrator may change on someone's account. Absent fields
/// keep their current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub nickname: Option<String>,
    #[serde(alias = "phone")]
    pub contact_phone: Option<String>,
}

impl Client {
    /// Logs in with the shorter login timeout.
    pub async fn login(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<Session, Error> {
        let req = self
            .request(Method::POST, &["auth", "login"], None)
            .timeout(self.login_timeout)
            .json(&json!({
                "userId": user_id,
                "password": password,
            }));
        Ok(Session::from_raw(&self.send(req).await?)?)
    }

    /// Creates an account. Some upstream builds answer with the new user,
    /// others with nothing.
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<Option<Profile>, Error> {
        let req = self
            .request(Method::POST, &["auth", "register"], None)
            .json(registration);
        let data = self.send(req).await?;
        Ok(data.is_object().then(|| Profile::from_raw(&data)))
    }

    pub async fn me(&self, token: &str) -> Result<Profile, Error> {
        let req = self.request(Method::GET, &["users", "me"], Some(token));
        Ok(Profile::from_raw(&self.send(req).await?))
    }

    pub async fn update_me(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, Error> {
        let req = self
            .request(Method::PUT, &["users", "me"], Some(token))
            .json(update);
        Ok(Profile::from_raw(&self.send(req).await?))
    }

    pub async fn user(&self, token: &str, id: &Id) -> Result<Profile, Error> {
        let id = id.to_string();
        let req = self.request(Method::GET, &["users", &id], Some(token));
        Ok(Profile::from_raw(&self.send(req).await?))
    }

    /// Student or repairman directory. The upstream answers either with a
    /// bare array or with an enveloped page.
    pub async fn members(
        &self,
        token: &str,
        kind: MemberKind,
        filters: &Filters,
    ) -> Result<Vec<Member>, Error> {
        let mut query = filters.to_query();
        query.push(("role", kind.role().token().to_owned()));
        let req = self
            .request(Method::GET, &["users"], Some(token))
            .query(&query);
        let data = self.send(req).await?;
        Ok(Page::from_data(&data, |item| Member::from_raw(item, kind)).items)
    }

    /// Updates an account on an administrator's behalf. The upstream wants
    /// the whole registration record, so the current one is fetched first
    /// and only the given fields are replaced.
    pub async fn update_user(
        &self,
        token: &str,
        id: &Id,
        update: UserUpdate,
    ) -> Result<Profile, Error> {
        let current = self.user(token, id).await?;
        let registration = Registration {
            user_id: current.id.as_ref().unwrap_or(id).to_string(),
            password: UNCHANGED_PASSWORD.to_owned(),
            nickname: update.nickname.unwrap_or(current.name),
            contact_phone: update.contact_phone.unwrap_or(current.phone),
            role: current.role.unwrap_or(Role::Student),
        };

        let id = id.to_string();
        let req = self
            .request(Method::PUT, &["admin", "users", &id], Some(token))
            .json(&registration);
        Ok(Profile::from_raw(&self.send(req).await?))
    }

    pub async fn reset_password(
        &self,
        token: &str,
        id: &Id,
    ) -> Result<PasswordReset, Error> {
        let id = id.to_string();
        let req = self.request(
            Method::POST,
            &["admin", "users", &id, "reset-password"],
            Some(token),
        );
        PasswordReset::from_raw(&self.send(req).await?)
            .ok_or(Error::MissingField("newPassword"))
    }

    /// Disables the account; the upstream keeps the record.
    pub async fn delete_user(&self, token: &str, id: &Id) -> Result<(), Error> {
        let id = id.to_string();
        let req =
            self.request(Method::DELETE, &["admin", "users", &id], Some(token));
        self.send(req).await.map(drop)
    }
}
