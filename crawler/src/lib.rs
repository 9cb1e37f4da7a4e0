//! Paginated crawl of the free-course listing.
//!
//! Listing pages are fetched one after another until enough of them come
//! back without course cards. Each listed course then gets its description
//! from its own detail page; the detail pages of one listing page are fetched
//! together.

use anyhow::{anyhow, Result};
use catalog::persist::save_courses;
use catalog::{Course, NO_DESCRIPTION};
use futures::future::join_all;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

pub const BASE_URL: &str = "https://courses.analyticsvidhya.com";
pub const LISTING_PATH: &str = "/pages/all-free-courses";
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Failed attempts on one listing page before moving to the next.
pub const RETRY_LIMIT: u32 = 2;
/// Failed listing attempts, counted across pages, that end the crawl.
pub const MAX_EMPTY_RESPONSES: u32 = 3;
pub const SUCCESS_DELAY: Duration = Duration::from_secs(1);
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    pub retry_limit: u32,
    pub max_empty_responses: u32,
    /// Pause after a listing page that produced courses.
    pub success_delay: Duration,
    /// Pause after a listing attempt that produced none.
    pub retry_delay: Duration,
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        Self {
            retry_limit: RETRY_LIMIT,
            max_empty_responses: MAX_EMPTY_RESPONSES,
            success_delay: SUCCESS_DELAY,
            retry_delay: RETRY_DELAY,
        }
    }
}

/// What one listing request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    Courses(Vec<Course>),
    /// The page had no course cards.
    Empty,
    /// Request failed, returned a non-success status, or the body was unreadable.
    Transport(String),
    /// Cards were present but none had a title, link and image.
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub courses: Vec<Course>,
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    /// Page number the crawl stopped on.
    pub last_page: u32,
    pub elapsed: Duration,
}

struct Selectors {
    card: Selector,
    title: Selector,
    link: Selector,
    image: Selector,
    description: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e}"))
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            card: selector("li.course-cards__list-item")?,
            title: selector("h3")?,
            link: selector("a.course-card")?,
            image: selector("img.course-card__img")?,
            description: selector("div.course-description")?,
        })
    }
}

pub struct Crawler {
    client: Client,
    base: Url,
    listing: Url,
    policy: CrawlPolicy,
    selectors: Selectors,
}

impl Crawler {
    pub fn new(base: Url, policy: CrawlPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        let listing = base.join(LISTING_PATH)?;
        Ok(Self { client, base, listing, policy, selectors: Selectors::new()? })
    }

    pub fn listing_url(&self, page: u32) -> Url {
        let mut url = self.listing.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    pub async fn fetch_course_list(&self, page: u32) -> ListingOutcome {
        let url = self.listing_url(page);
        let outcome = match self.client.get(url).send().await {
            Ok(resp) if !resp.status().is_success() => {
                ListingOutcome::Transport(format!("status {}", resp.status()))
            }
            Ok(resp) => match resp.text().await {
                Ok(body) => self.parse_listing(&body),
                Err(e) => ListingOutcome::Transport(e.to_string()),
            },
            Err(e) => ListingOutcome::Transport(e.to_string()),
        };
        match &outcome {
            ListingOutcome::Courses(courses) => debug!(page, count = courses.len(), "listing parsed"),
            ListingOutcome::Empty => warn!(page, "no course data found"),
            ListingOutcome::Transport(err) => warn!(page, %err, "error fetching listing page"),
            ListingOutcome::Parse(err) => warn!(page, %err, "unusable listing page"),
        }
        outcome
    }

    pub fn parse_listing(&self, body: &str) -> ListingOutcome {
        let doc = Html::parse_document(body);
        let cards: Vec<ElementRef> = doc.select(&self.selectors.card).collect();
        if cards.is_empty() {
            return ListingOutcome::Empty;
        }
        let mut courses = Vec::with_capacity(cards.len());
        for card in &cards {
            match self.parse_card(card) {
                Some(course) => courses.push(course),
                None => debug!("skipping incomplete course card"),
            }
        }
        if courses.is_empty() {
            return ListingOutcome::Parse(format!("none of {} cards had a title, link and image", cards.len()));
        }
        ListingOutcome::Courses(courses)
    }

    fn parse_card(&self, card: &ElementRef) -> Option<Course> {
        let title = card.select(&self.selectors.title).next()?.text().collect::<String>();
        let href = card.select(&self.selectors.link).next()?.value().attr("href")?;
        let image = card.select(&self.selectors.image).next()?.value().attr("src")?;
        let link = self.resolve_link(href)?;
        Some(Course::listed(title.trim(), link, image))
    }

    /// Resolve `href` against the base origin. Links that leave the origin are dropped.
    fn resolve_link(&self, href: &str) -> Option<String> {
        let url = self.base.join(href.trim()).ok()?;
        if url.origin() != self.base.origin() {
            debug!(href, "course link outside base origin");
            return None;
        }
        Some(url.to_string())
    }

    /// Fill in `course.description` from its detail page. Any failure leaves
    /// the placeholder in place.
    pub async fn fetch_course_details(&self, course: &mut Course) {
        let body = match self.client.get(&course.link).send().await {
            Ok(resp) if resp.status().is_success() => resp.text().await,
            Ok(resp) => {
                warn!(title = %course.title, status = %resp.status(), "error fetching course details");
                course.description = NO_DESCRIPTION.to_string();
                return;
            }
            Err(e) => Err(e),
        };
        course.description = match body {
            Ok(body) => self.parse_description(&body).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            Err(e) => {
                warn!(title = %course.title, err = %e, "error fetching course details");
                NO_DESCRIPTION.to_string()
            }
        };
    }

    pub fn parse_description(&self, body: &str) -> Option<String> {
        let doc = Html::parse_document(body);
        let node = doc.select(&self.selectors.description).next()?;
        Some(node.text().collect::<String>().trim().to_string())
    }

    /// Walk listing pages until the empty-response ceiling is hit.
    ///
    /// Every failed attempt bumps both the per-page retry count and the
    /// empty-response count. Exhausting retries skips the page and resets
    /// only the retry count, so failures keep adding up across skipped pages
    /// until a page with courses resets them.
    pub async fn scrape_all_courses(&self) -> CrawlSummary {
        let start = Instant::now();
        let policy = &self.policy;
        let mut all_courses: Vec<Course> = Vec::new();
        let mut page: u32 = 1;
        let mut empty_responses: u32 = 0;
        let mut retries: u32 = 0;
        let mut pages_fetched: u32 = 0;
        let mut pages_skipped: u32 = 0;

        loop {
            let mut courses = match self.fetch_course_list(page).await {
                ListingOutcome::Courses(courses) => courses,
                _ => {
                    empty_responses += 1;
                    retries += 1;
                    if retries >= policy.retry_limit {
                        warn!(page, retries, "skipping page");
                        retries = 0;
                        page += 1;
                        pages_skipped += 1;
                    }
                    if empty_responses >= policy.max_empty_responses {
                        info!(empty_responses, "stopping after repeated empty responses");
                        break;
                    }
                    info!(attempts_left = policy.max_empty_responses - empty_responses, "waiting for more data");
                    sleep(policy.retry_delay).await;
                    continue;
                }
            };

            empty_responses = 0;
            info!(page, count = courses.len(), "fetched courses");
            join_all(courses.iter_mut().map(|course| self.fetch_course_details(course))).await;
            all_courses.append(&mut courses);
            pages_fetched += 1;
            page += 1;
            sleep(policy.success_delay).await;
        }

        CrawlSummary { courses: all_courses, pages_fetched, pages_skipped, last_page: page, elapsed: start.elapsed() }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: Url,
    pub output: PathBuf,
    pub policy: CrawlPolicy,
}

/// Crawl everything and write the result in one go. Nothing is written when
/// no course was found.
pub async fn run(config: &CrawlConfig) -> Result<CrawlSummary> {
    let crawler = Crawler::new(config.base_url.clone(), config.policy.clone())?;
    info!(base = %config.base_url, output = %config.output.display(), "starting crawl");
    let summary = crawler.scrape_all_courses().await;
    if summary.courses.is_empty() {
        warn!("no courses were scraped");
    } else {
        save_courses(&config.output, &summary.courses)?;
        info!(
            total = summary.courses.len(),
            described = described_count(&summary.courses),
            pages = summary.pages_fetched,
            skipped = summary.pages_skipped,
            output = %config.output.display(),
            "scraping completed"
        );
    }
    info!(elapsed_s = summary.elapsed.as_secs_f64(), "crawl finished");
    Ok(summary)
}

/// Courses whose detail page yielded a real description.
pub fn described_count(courses: &[Course]) -> usize {
    courses.iter().filter(|c| c.has_description()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler() -> Crawler {
        Crawler::new(Url::parse(BASE_URL).unwrap(), CrawlPolicy::default()).unwrap()
    }

    fn card(title: &str, href: &str, src: &str) -> String {
        format!(
            r#"<li class="course-cards__list-item"><a class="course-card" href="{href}"><img class="course-card__img" src="{src}"><h3> {title} </h3></a></li>"#
        )
    }

    #[test]
    fn listing_url_carries_page_number() {
        assert_eq!(
            crawler().listing_url(3).as_str(),
            "https://courses.analyticsvidhya.com/pages/all-free-courses?page=3"
        );
    }

    #[test]
    fn parses_complete_cards_and_skips_others() {
        let body = format!(
            "<ul>{}{}<li class=\"course-cards__list-item\"><h3>No link</h3></li></ul>",
            card("Intro to Python", "/courses/intro-to-python", "https://img/1.png"),
            card("Off site", "https://elsewhere.example/course", "https://img/2.png"),
        );
        let ListingOutcome::Courses(courses) = crawler().parse_listing(&body) else {
            panic!("expected courses");
        };
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Intro to Python");
        assert_eq!(courses[0].link, "https://courses.analyticsvidhya.com/courses/intro-to-python");
        assert_eq!(courses[0].image, "https://img/1.png");
        assert_eq!(courses[0].description, NO_DESCRIPTION);
    }

    #[test]
    fn empty_and_unusable_pages_are_distinguished() {
        let c = crawler();
        assert_eq!(c.parse_listing("<html><body><p>nothing</p></body></html>"), ListingOutcome::Empty);
        let broken = "<li class=\"course-cards__list-item\"><h3>Only a title</h3></li>";
        assert!(matches!(c.parse_listing(broken), ListingOutcome::Parse(_)));
    }

    #[test]
    fn description_is_trimmed_text() {
        let body = "<div class=\"course-description\">\n  Learn <b>Python</b> basics \n</div>";
        assert_eq!(crawler().parse_description(body).as_deref(), Some("Learn Python basics"));
        assert_eq!(crawler().parse_description("<div>other</div>"), None);
    }
}
