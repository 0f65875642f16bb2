use anyhow::Context;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::{config::FcmConfig, constants::*, utils::get_epoch_ts};

#[derive(Debug, Serialize, Deserialize)]
struct GoogleTokenClaims {
    iss: String,
    iat: u64,
    exp: u64,
    aud: String,
    scope: String,
}

impl GoogleTokenClaims {
    fn new(client_email: &str) -> Self {
        let ts = get_epoch_ts();
        Self {
            iss: client_email.to_string(),
            iat: ts,
            exp: ts + GOOGLE_TOKEN_VALIDITY,
            aud: GOOGLE_TOKEN_URL.to_string(),
            scope: FIREBASE_MESSAGE_SCOPE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    expires_in: u64,
}

/// OAuth2 access token of the firebase service account, refreshed on demand
pub struct GoogleAuthToken {
    client_email: String,
    private_key: String,
    access_token: Option<String>,
    valid_till: Option<u64>,
    signing_key: Option<EncodingKey>,
}

impl GoogleAuthToken {
    pub fn new(config: &FcmConfig) -> Self {
        Self {
            client_email: config.client_email.to_owned(),
            private_key: config.private_key.to_owned(),
            access_token: None,
            valid_till: None,
            signing_key: None,
        }
    }

    pub async fn get_access_token(&mut self, client: &reqwest::Client) -> anyhow::Result<&str> {
        if self.is_new_token_required(get_epoch_ts()) {
            self.new_access_token(client).await?;
        }
        self.access_token
            .as_deref()
            .ok_or(anyhow::anyhow!("access_token not found"))
    }

    fn get_signing_key(&mut self) -> anyhow::Result<&EncodingKey> {
        if self.signing_key.is_none() {
            let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
                .context("invalid firebase service private key")?;
            self.signing_key = Some(key);
        }
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(anyhow::anyhow!("signing_key not found"))?;
        Ok(signing_key)
    }

    fn is_new_token_required(&self, ts: u64) -> bool {
        match (&self.access_token, self.valid_till) {
            (Some(_), Some(valid_till)) => ts >= valid_till,
            _ => true,
        }
    }

    async fn new_access_token(&mut self, client: &reqwest::Client) -> anyhow::Result<()> {
        tracing::debug!("requesting new google access token");
        let signed_jwt = self.new_jwt()?;
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", signed_jwt.as_str()),
        ];
        let response = client
            .post(GOOGLE_TOKEN_URL)
            .form(&params)
            .send()
            .await?
            .error_for_status()
            .context("google token endpoint rejected the request")?
            .json::<GoogleTokenResponse>()
            .await?;
        let ts = get_epoch_ts();
        let valid_till = (ts + response.expires_in).saturating_sub(GOOGLE_TOKEN_REFRESH_MARGIN);
        self.access_token = Some(response.access_token);
        self.valid_till = Some(valid_till);

        Ok(())
    }

    fn new_jwt(&mut self) -> anyhow::Result<String> {
        let claims = GoogleTokenClaims::new(&self.client_email);
        let key = self.get_signing_key()?;
        let header = Header::new(Algorithm::RS256);
        let jwt = encode(&header, &claims, key)?;
        Ok(jwt)
    }
}
