//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use fmxml_lib::FmsClient;
use fmxml_lib::Transport;
use fmxml_lib::error::ApiError;
use url::Url;
use url::form_urlencoded;

type Handler = dyn Fn(&Url) -> Option<String> + Send + Sync;

/// Serves canned responses and records every requested URL.
#[derive(Clone)]
pub struct FixtureTransport {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<Url>>>,
}

impl FixtureTransport {
    /// Answers each request with `handler`; `None` becomes an HTTP 404.
    pub fn new(handler: impl Fn(&Url) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers every request to the `fmresultset` grammar with `body`, and
    /// every layout request with [`LAYOUT_INFO`].
    pub fn result_set(body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |url| match url.path() {
            "/fmi/xml/fmresultset.xml" => Some(body.clone()),
            "/fmi/xml/FMPXMLLAYOUT.xml" => Some(LAYOUT_INFO.to_string()),
            _ => None,
        })
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the requests sent to one endpoint path.
    pub fn requests_to(&self, path: &str) -> Vec<Url> {
        self.requests()
            .into_iter()
            .filter(|url| url.path() == path)
            .collect()
    }

    pub fn last_request(&self) -> Option<Url> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, ApiError> {
        self.requests.lock().unwrap().push(url.clone());
        match (self.handler)(url) {
            Some(body) => Ok(body.into_bytes()),
            None => Err(ApiError::http(404, url.to_string())),
        }
    }
}

/// Creates a client on database `FMPHP_Sample` served by `transport`.
pub fn client(transport: &FixtureTransport) -> FmsClient {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Debug, simplelog::Config::default());

    FmsClient::builder()
        .url("http://fms.test")
        .guest()
        .database("FMPHP_Sample")
        .transport(transport.clone())
        .build()
        .unwrap()
}

/// Decodes a request's query into name/value pairs.
pub fn pairs(url: &Url) -> Vec<(String, String)> {
    form_urlencoded::parse(url.query().unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

/// Returns the decoded value of one directive.
pub fn param(url: &Url, name: &str) -> Option<String> {
    pairs(url)
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

// =============================================================================
// Fixture documents
// =============================================================================

pub const LAYOUT_INFO: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<FMPXMLLAYOUT xmlns="http://www.filemaker.com/fmpxmllayout">
  <ERRORCODE>0</ERRORCODE>
  <PRODUCT BUILD="03/21/2016" NAME="FileMaker Web Publishing Engine" VERSION="15.0.1.137"/>
  <LAYOUT DATABASE="FMPHP_Sample" NAME="English">
    <FIELD NAME="Title"><STYLE TYPE="EDITTEXT" VALUELIST=""/></FIELD>
    <FIELD NAME="Status"><STYLE TYPE="POPUPMENU" VALUELIST="Availability"/></FIELD>
  </LAYOUT>
  <VALUELISTS>
    <VALUELIST NAME="Availability">
      <VALUE DISPLAY="In">In</VALUE>
      <VALUE DISPLAY="Out">Out</VALUE>
    </VALUELIST>
  </VALUELISTS>
</FMPXMLLAYOUT>"#;

pub const TITLES: [&str; 12] = [
    "Texas",
    "Alaska",
    "Idaho",
    "Colorado",
    "California",
    "America",
    "New York",
    "Florida",
    "Washington",
    "Arizona",
    "Pennsylvania",
    "Hawaii",
];

/// Renders an `fmresultset` response on layout `English`.
///
/// Each row is `(record id, title)`; `found` is the size of the whole found
/// set.
pub fn english(rows: &[(usize, &str)], found: usize) -> String {
    let records: String = rows
        .iter()
        .map(|(record_id, title)| {
            format!(
                r#"<record mod-id="1" record-id="{record_id}">
                  <field name="Title"><data>{title}</data></field>
                  <field name="Status"><data>In</data></field>
                </record>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<fmresultset xmlns="http://www.filemaker.com/xml/fmresultset" version="1.0">
  <error code="{code}"/>
  <product build="03/21/2016" name="FileMaker Web Publishing Engine" version="15.0.1.137"/>
  <datasource database="FMPHP_Sample" date-format="MM/dd/yyyy" layout="English" table="English"
      time-format="HH:mm:ss" timestamp-format="MM/dd/yyyy HH:mm:ss" total-count="{total}"/>
  <metadata>
    <field-definition auto-enter="no" four-digit-year="no" global="no" max-repeat="1" name="Title"
        not-empty="no" numeric-only="no" result="text" time-of-day="no" type="normal"/>
    <field-definition auto-enter="no" four-digit-year="no" global="no" max-repeat="1" name="Status"
        not-empty="no" numeric-only="no" result="text" time-of-day="no" type="normal"/>
  </metadata>
  <resultset count="{found}" fetch-size="{fetched}">{records}</resultset>
</fmresultset>"#,
        code = if rows.is_empty() && found == 0 { 401 } else { 0 },
        total = TITLES.len(),
        fetched = rows.len(),
    )
}

/// A small server for layout `English` that honours `-recid`, `-sortfield.1`,
/// `-sortorder.1`, `-skip` and `-max` over [`TITLES`].
pub fn english_server() -> FixtureTransport {
    FixtureTransport::new(|url| match url.path() {
        "/fmi/xml/FMPXMLLAYOUT.xml" => Some(LAYOUT_INFO.to_string()),
        "/fmi/xml/fmresultset.xml" => {
            let mut rows: Vec<(usize, &str)> =
                TITLES.iter().enumerate().map(|(i, t)| (i + 1, *t)).collect();

            if let Some(record_id) = param(url, "-recid") {
                rows.retain(|(id, _)| id.to_string() == record_id);
            }
            if param(url, "-view").is_some() {
                rows.clear();
            }
            if param(url, "-sortfield.1").as_deref() == Some("Title") {
                rows.sort_by_key(|(_, title)| *title);
                if param(url, "-sortorder.1").as_deref() == Some("descend") {
                    rows.reverse();
                }
            }

            let found = rows.len();
            let skip = param(url, "-skip").map_or(0, |s| s.parse().unwrap());
            let max = match param(url, "-max").as_deref() {
                None | Some("all") => usize::MAX,
                Some(n) => n.parse().unwrap(),
            };
            let page: Vec<(usize, &str)> = rows.into_iter().skip(skip).take(max).collect();
            Some(english(&page, found))
        }
        _ => None,
    })
}

pub const FAMILY: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<fmresultset xmlns="http://www.filemaker.com/xml/fmresultset" version="1.0">
  <error code="0"/>
  <product build="03/21/2016" name="FileMaker Web Publishing Engine" version="15.0.1.137"/>
  <datasource database="FMPHP_Sample" date-format="MM/dd/yyyy" layout="Family" table="People"
      time-format="HH:mm:ss" timestamp-format="MM/dd/yyyy HH:mm:ss" total-count="1"/>
  <metadata>
    <field-definition max-repeat="1" name="Name" result="text" type="normal"/>
    <field-definition max-repeat="1" name="Born" result="date" type="normal"/>
    <relatedset-definition table="Dependents">
      <field-definition max-repeat="1" name="Dependents::Name" result="text" type="normal"/>
      <field-definition max-repeat="1" name="Dependents::Age" result="number" type="normal"/>
    </relatedset-definition>
  </metadata>
  <resultset count="1" fetch-size="1">
    <record mod-id="3" record-id="14">
      <field name="Name"><data>Ann</data></field>
      <field name="Born"><data>02/29/1980</data></field>
      <relatedset count="2" table="Dependents">
        <record mod-id="1" record-id="20">
          <field name="Dependents::Name"><data>Bo</data></field>
          <field name="Dependents::Age"><data>12</data></field>
        </record>
        <record mod-id="1" record-id="21">
          <field name="Dependents::Name"><data>Cy</data></field>
          <field name="Dependents::Age"><data>9</data></field>
        </record>
      </relatedset>
    </record>
  </resultset>
</fmresultset>"#;
