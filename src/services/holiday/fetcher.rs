use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::HolidaySource;
use crate::models::holiday::Holiday;

pub const DEFAULT_HOLIDAY_API_BASE_URL: &str = "https://date.nager.at/";

/// Fetches public holidays from a Nager.Date compatible API.
pub struct NagerHolidayFetcher {
    client: Client,
    base_url: String,
    max_response_bytes: usize,
}

impl NagerHolidayFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            bail!("Holiday API URL must use HTTP(S): {}", base_url);
        }

        let client = Client::builder()
            .build()
            .context("Failed to build holiday HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_response_bytes: 1024 * 1024,
        })
    }

    fn holidays_url(&self, year: i32, country_code: &str) -> String {
        format!(
            "{}/api/v3/PublicHolidays/{}/{}",
            self.base_url, year, country_code
        )
    }

    fn parse_body(&self, bytes: &[u8]) -> Result<Vec<Holiday>> {
        if bytes.len() > self.max_response_bytes {
            bail!(
                "Holiday response too large ({} bytes > {} bytes)",
                bytes.len(),
                self.max_response_bytes
            );
        }

        serde_json::from_slice(bytes).context("Holiday response is not a valid holiday list")
    }
}

/// Two ASCII letters, returned upper-cased.
pub(crate) fn normalize_country_code(country_code: &str) -> Result<String> {
    let code = country_code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(anyhow!(
            "Country code must be two letters (ISO 3166-1 alpha-2), got {:?}",
            country_code
        ));
    }
    Ok(code.to_ascii_uppercase())
}

impl HolidaySource for NagerHolidayFetcher {
    fn fetch_holidays(&self, year: i32, country_code: &str) -> Result<Vec<Holiday>> {
        let country_code = normalize_country_code(country_code)?;
        let url = self.holidays_url(year, &country_code);
        log::info!("Fetching holidays for {} {}", country_code, year);

        let response = self
            .client
            .get(&url)
            .send()
            .context("Network error during holiday fetch")?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("Holiday fetch failed with HTTP status {}", status);
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_bytes {
                bail!(
                    "Holiday response too large ({} bytes > {} bytes)",
                    content_length,
                    self.max_response_bytes
                );
            }
        }

        let bytes = response
            .bytes()
            .context("Failed to read holiday response body")?;
        let holidays = self.parse_body(&bytes)?;

        log::info!(
            "Fetched {} holidays for {} {}",
            holidays.len(),
            country_code,
            year
        );
        Ok(holidays)
    }
}
