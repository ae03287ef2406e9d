use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;

use crate::models::word::WordFields;
use crate::Result;

// Structural markers on the translate page. These track the page's
// obfuscated class names and break whenever Google ships new markup.
const EXPAND_BUTTON_XPATH: &str = "//*[@id=\"yDmH0d\"]/c-wiz/div/div[2]/c-wiz/div[2]/c-wiz/div[2]/c-wiz/div/div/div[2]/div[1]/div[2]/div[1]";
const DEFINITION_MARKER: &str = "fw3eif";
const SYNONYM_MARKER: &str = "MtFg0";
const TRANSLATION_MARKER: &str = "HwtZe";
const OTHER_TRANSLATIONS_MARKER: &str = "kgnlhe";
const EXAMPLE_SELECTOR: &str = ".AZPoqf.OvhKBb";

const EXPAND_WAIT: Duration = Duration::from_secs(20);
const EXPAND_POLL: Duration = Duration::from_millis(500);

/// Source of scraped word data.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn fetch(&self, word: &str) -> Result<WordFields>;
}

/// Scrapes word data from Google Translate through a WebDriver session.
///
/// Every `fetch` call owns a private browser session for its full duration;
/// nothing is shared between requests.
pub struct Extractor {
    webdriver_url: String,
}

impl Extractor {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
        }
    }

    async fn start_session(&self) -> Result<WebDriver> {
        // flags for running Chrome inside a container
        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless()?;
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;
        caps.set_disable_gpu()?;

        Ok(WebDriver::new(&self.webdriver_url, caps).await?)
    }
}

#[async_trait]
impl WordSource for Extractor {
    async fn fetch(&self, word: &str) -> Result<WordFields> {
        let driver = self.start_session().await?;
        let result = scrape_page(&driver, word).await;

        // the session dies with the call, whatever the scrape did
        if let Err(e) = driver.quit().await {
            tracing::warn!("failed to shut down browser session: {e}");
        }

        result
    }
}

async fn scrape_page(driver: &WebDriver, word: &str) -> Result<WordFields> {
    driver.goto(translate_url(word).as_str()).await?;
    expand_details(driver).await?;

    let definitions = collect_text(driver, By::ClassName(DEFINITION_MARKER)).await?;
    let synonyms = dedupe(collect_text(driver, By::ClassName(SYNONYM_MARKER)).await?);

    // primary translation first, then the "other translations" block
    let mut translations = collect_text(driver, By::ClassName(TRANSLATION_MARKER)).await?;
    translations.extend(collect_text(driver, By::ClassName(OTHER_TRANSLATIONS_MARKER)).await?);

    let examples = collect_text(driver, By::Css(EXAMPLE_SELECTOR)).await?;

    Ok(WordFields {
        definitions,
        synonyms,
        translations,
        examples,
    })
}

/// Click the details-expansion control if it shows up within the wait
/// window. Short inputs never render it; the page then only shows whatever
/// fits uncollapsed, so a missing control is not an error.
async fn expand_details(driver: &WebDriver) -> Result<()> {
    let found = driver
        .query(By::XPath(EXPAND_BUTTON_XPATH))
        .wait(EXPAND_WAIT, EXPAND_POLL)
        .and_clickable()
        .first()
        .await;

    match found {
        Ok(button) => Ok(button.click().await?),
        Err(WebDriverError::NoSuchElement(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn collect_text(driver: &WebDriver, by: By) -> Result<Vec<String>> {
    let mut values = Vec::new();
    for element in driver.find_all(by).await? {
        let text = element.text().await?;
        if !text.is_empty() {
            values.push(text);
        }
    }
    Ok(values)
}

fn translate_url(word: &str) -> String {
    format!(
        "https://translate.google.com/?sl=en&tl=ru&text={}&op=translate",
        urlencoding::encode(word)
    )
}

// the page repeats synonyms across senses; stored as a set, order not kept
fn dedupe(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}
