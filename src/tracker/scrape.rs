use super::announce::query_separator;
use crate::data_structures::ID;

#[derive(Debug)]
pub struct Scrape<'a> {
    pub scrape_url: &'a str,
    pub info_hash: &'a ID,
}

impl Scrape<'_> {
    pub fn as_url(&self) -> String {
        let mut s = String::from(self.scrape_url);

        s.push(query_separator(self.scrape_url));
        s.push_str("info_hash=");
        s.push_str(urlencoding::encode_binary(self.info_hash.as_byte_ref()).as_ref());

        s
    }
}
