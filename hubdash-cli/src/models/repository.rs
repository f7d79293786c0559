/// First page of the repository listing, in the order the service returned it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryPage {
    pub names: Vec<String>,
    pub markers: PageMarkers,
}

/// Pagination markers for a listing page. Zero means "not applicable".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMarkers {
    pub first: u32,
    pub prev: u32,
    pub next: u32,
    pub last: u32,
}

impl PageMarkers {
    /// Parse an HTTP `Link` header as sent by GitHub:
    ///
    /// `<https://api.github.com/user/repos?page=2>; rel="next", <...page=5>; rel="last"`
    ///
    /// Unknown relations and links without a `page` parameter are skipped.
    pub fn from_link_header(header: &str) -> Self {
        let mut markers = Self::default();

        for link in header.split(',') {
            let mut parts = link.split(';');
            let Some(target) = parts.next() else {
                continue;
            };
            let target = target.trim().trim_start_matches('<').trim_end_matches('>');

            let Some(page) = page_number(target) else {
                continue;
            };

            for param in parts {
                let param = param.trim();
                let Some(rel) = param.strip_prefix("rel=") else {
                    continue;
                };

                match rel.trim_matches('"') {
                    "first" => markers.first = page,
                    "prev" => markers.prev = page,
                    "next" => markers.next = page,
                    "last" => markers.last = page,
                    _ => {}
                }
            }
        }

        markers
    }
}

fn page_number(target: &str) -> Option<u32> {
    let url = reqwest::Url::parse(target).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
