//! Sitemap reading for the crawler module
//!
//! Parses documents following the sitemaps.org `urlset/url/loc` schema and
//! resolves every entry against a configured origin.

use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::crawler::error::CrawlError;

/// XML representation of a sitemap `urlset`
#[derive(Deserialize, Debug)]
#[serde(rename = "urlset")]
struct UrlSet {
    #[serde(rename = "url", default)]
    urls: Vec<UrlEntry>,
}

/// XML representation of a single sitemap entry
#[derive(Deserialize, Debug)]
struct UrlEntry {
    #[serde(default)]
    loc: Option<String>,
}

/// Parse a sitemap document into its raw `loc` values, in document order
///
/// Entries without a `loc`, or with a blank one, yield no location.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, CrawlError> {
    let urlset: UrlSet = from_str(xml)?;
    Ok(urlset
        .urls
        .into_iter()
        .filter_map(|entry| entry.loc)
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect())
}

/// Prefix every location with the base origin
///
/// Locations are treated as site-relative paths and concatenated verbatim.
pub fn resolve_locations<I, S>(base_url: &str, locations: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    locations
        .into_iter()
        .map(|loc| format!("{}{}", base_url, loc.as_ref()))
        .collect()
}

/// Fetch a sitemap and return the candidate page URLs
///
/// Any transport failure, non-success status or malformed document is fatal.
#[instrument(skip(client))]
pub async fn fetch_sitemap(
    client: &Client,
    sitemap_url: &str,
    base_url: &str,
) -> Result<Vec<String>, CrawlError> {
    info!("Fetching sitemap {}", sitemap_url);

    let response = client.get(sitemap_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            status,
            url: sitemap_url.to_string(),
        });
    }

    let body = response.text().await?;
    let locations = parse_sitemap(&body)?;
    debug!("Sitemap lists {} locations", locations.len());

    Ok(resolve_locations(base_url, locations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>admissions</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>academics/majors</loc></url>
  <url>
    <loc>
      news.xml
    </loc>
  </url>
</urlset>"#;

    #[test]
    fn test_parse_sitemap() {
        let locations = parse_sitemap(SITEMAP).unwrap();
        assert_eq!(locations, vec!["admissions", "academics/majors", "news.xml"]);
    }

    #[test]
    fn test_parse_empty_urlset() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
        assert!(parse_sitemap(xml).unwrap().is_empty());
    }

    #[test]
    fn test_entries_without_loc_yield_no_candidate() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>a</loc></url>
  <url><lastmod>2024-01-01</lastmod></url>
  <url><loc>   </loc></url>
</urlset>"#;
        let locations = parse_sitemap(xml).unwrap();
        assert_eq!(locations, vec!["a"]);

        let urls = resolve_locations("https://my.wlu.edu/", &locations);
        assert_eq!(urls, vec!["https://my.wlu.edu/a"]);
    }

    #[test]
    fn test_parse_malformed_sitemap() {
        let xml = "<urlset><url><loc>admissions</url></urlset>";
        assert!(matches!(
            parse_sitemap(xml),
            Err(CrawlError::SitemapParse(_))
        ));
    }

    #[test]
    fn test_resolve_locations_prefixes_every_entry() {
        let locations = parse_sitemap(SITEMAP).unwrap();
        let urls = resolve_locations("https://my.wlu.edu/", &locations);

        assert_eq!(urls.len(), locations.len());
        assert!(urls.iter().all(|u| u.starts_with("https://my.wlu.edu/")));
        assert_eq!(urls[1], "https://my.wlu.edu/academics/majors");
    }

    #[tokio::test]
    async fn test_fetch_sitemap_success() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/sitemap.xml")
            .with_status(200)
            .with_header("content-type", "application/xml")
            .with_body(SITEMAP)
            .expect(1)
            .create_async()
            .await;

        let client = Client::new();
        let sitemap_url = format!("{}/sitemap.xml", server.url());
        let base = format!("{}/", server.url());
        let urls = fetch_sitemap(&client, &sitemap_url, &base).await.unwrap();

        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], format!("{}/admissions", server.url()));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_sitemap_error_status_is_fatal() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/sitemap.xml")
            .with_status(503)
            .create_async()
            .await;

        let client = Client::new();
        let sitemap_url = format!("{}/sitemap.xml", server.url());
        let result = fetch_sitemap(&client, &sitemap_url, "https://my.wlu.edu/").await;

        match result {
            Err(CrawlError::Status { status, url }) => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(url, sitemap_url);
            }
            other => panic!("Expected Status error, got {:?}", other),
        }

        mock_server.assert_async().await;
    }
}
