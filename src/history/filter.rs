use super::ScanRecord;

/// Records whose payload or content type tag contains `query`,
/// case-insensitively. An empty query keeps everything.
pub fn filter(records: &[ScanRecord], query: &str) -> Vec<ScanRecord> {
    if query.is_empty() {
        return records.to_vec();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.payload.to_lowercase().contains(&needle)
                || r.content_type.as_str().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ContentType;

    fn record(id: &str, content_type: ContentType, payload: &str) -> ScanRecord {
        ScanRecord {
            id: id.to_string(),
            content_type,
            payload: payload.to_string(),
            captured_at: 0,
        }
    }

    fn sample() -> Vec<ScanRecord> {
        vec![
            record("3", ContentType::Wifi, "WIFI:T:WPA;S:lab;P:pw;;"),
            record("2", ContentType::Url, "https://Example.com/menu"),
            record("1", ContentType::Text, "grocery list"),
        ]
    }

    #[test]
    fn empty_query_returns_everything() {
        assert_eq!(filter(&sample(), ""), sample());
    }

    #[test]
    fn matches_type_case_insensitively() {
        let records = vec![
            record("2", ContentType::Wifi, "WIFI:T:WPA;S:net;P:pw;;"),
            record("1", ContentType::Url, "https://x.com"),
        ];
        let hits = filter(&records, "wifi");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn matches_payload_case_insensitively() {
        let hits = filter(&sample(), "EXAMPLE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn keeps_stored_order() {
        let hits = filter(&sample(), "e");
        let ids: Vec<&str> = hits.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter(&sample(), "zzz").is_empty());
    }
}
