//! XML feed parsing
//!
//! The feed is a paged response of the form
//!
//! ```xml
//! <response>
//!   <header><resultCode>00</resultCode><resultMsg>NORMAL SERVICE.</resultMsg></header>
//!   <body>
//!     <items>
//!       <item><ptNo>2012A40</ptNo><ptNm>...</ptNm><wmyr>2024</wmyr><wmod>06</wmod>
//!             <itemTemp>18.2</itemTemp>...</item>
//!     </items>
//!     <numOfRows>5</numOfRows><pageNo>1</pageNo><totalCount>120</totalCount>
//!   </body>
//! </response>
//! ```

use crate::Result;
use serde::Deserialize;

/// Result code of a successful feed response
pub const SUCCESS_CODE: &str = "00";

#[derive(Debug, Deserialize)]
struct RawResponse {
    header: RawHeader,
    #[serde(default)]
    body: Option<RawBody>,
}

#[derive(Debug, Deserialize)]
struct RawHeader {
    #[serde(rename = "resultCode")]
    result_code: String,
    #[serde(rename = "resultMsg", default)]
    result_msg: String,
}

#[derive(Debug, Deserialize)]
struct RawBody {
    #[serde(default)]
    items: Option<RawItems>,
    #[serde(rename = "totalCount", default)]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawItems {
    #[serde(rename = "item", default)]
    item: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "ptNo")]
    pt_no: String,
    #[serde(rename = "ptNm", default)]
    pt_nm: Option<String>,
    #[serde(default)]
    wmyr: Option<String>,
    #[serde(default)]
    wmod: Option<String>,
    #[serde(rename = "itemTemp", default)]
    item_temp: Option<String>,
    #[serde(rename = "itemPh", default)]
    item_ph: Option<String>,
    #[serde(rename = "itemDoc", default)]
    item_doc: Option<String>,
    #[serde(rename = "itemTn", default)]
    item_tn: Option<String>,
    #[serde(rename = "itemTp", default)]
    item_tp: Option<String>,
    #[serde(rename = "itemToc", default)]
    item_toc: Option<String>,
    #[serde(rename = "itemPhen", default)]
    item_phen: Option<String>,
    #[serde(rename = "itemCn", default)]
    item_cn: Option<String>,
}

/// One measurement row from the feed
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub site_id: String,
    pub site_name: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub dissolved_oxygen: Option<f64>,
    pub total_nitrogen: Option<f64>,
    pub total_phosphorus: Option<f64>,
    pub total_organic_carbon: Option<f64>,
    pub phenol: Option<f64>,
    pub cyanide: Option<f64>,
}

/// A parsed feed page
#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub result_code: String,
    pub result_message: String,
    pub total_count: Option<u64>,
    pub rows: Vec<Measurement>,
}

impl Feed {
    pub fn is_success(&self) -> bool {
        self.result_code == SUCCESS_CODE
    }
}

/// Blank and unparseable readings count as missing
fn reading(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
}

fn text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl From<RawItem> for Measurement {
    fn from(item: RawItem) -> Self {
        Self {
            site_id: item.pt_no.trim().to_string(),
            site_name: text(item.pt_nm),
            year: text(item.wmyr),
            month: text(item.wmod),
            temperature: reading(item.item_temp),
            ph: reading(item.item_ph),
            dissolved_oxygen: reading(item.item_doc),
            total_nitrogen: reading(item.item_tn),
            total_phosphorus: reading(item.item_tp),
            total_organic_carbon: reading(item.item_toc),
            phenol: reading(item.item_phen),
            cyanide: reading(item.item_cn),
        }
    }
}

/// Parse one feed page
pub fn parse_feed(xml: &str) -> Result<Feed> {
    let raw: RawResponse = quick_xml::de::from_str(xml)?;
    let (rows, total_count) = match raw.body {
        Some(body) => (
            body.items
                .map(|items| items.item.into_iter().map(Measurement::from).collect())
                .unwrap_or_default(),
            body.total_count,
        ),
        None => (Vec::new(), None),
    };

    Ok(Feed {
        result_code: raw.header.result_code.trim().to_string(),
        result_message: raw.header.result_msg.trim().to_string(),
        total_count,
        rows,
    })
}
