use profile_synth::export::{to_csv, to_text};
use profile_synth::generation::{
    Gender, LookupFailure, NameRegistry, PostalLookup, Profile, ProfileGenerator, ProfileLayout,
    RecordCount, ReferenceTables,
};
use std::collections::HashMap;

struct StaticZip;

impl PostalLookup for StaticZip {
    async fn lookup_zip(&self, _city: &str, _state: &str) -> Result<String, LookupFailure> {
        Ok("01234".to_string())
    }
}

async fn sample_profiles(total: u64) -> Vec<Profile> {
    let mut schools = HashMap::new();
    schools.insert(
        "Boston".to_string(),
        vec!["Boston Latin School".to_string(), "O'Bryant \"Tech\" School".to_string()],
    );
    let tables = ReferenceTables::new(HashMap::new(), schools);
    let mut generator = ProfileGenerator::new(tables, NameRegistry::in_memory(), StaticZip)
        .expect("generator")
        .with_seed(77);
    generator
        .produce_batch(Gender::Female, RecordCount::new(total).expect("count"))
        .await
        .expect("batch generated")
}

#[tokio::test]
async fn csv_round_trip_preserves_every_field() {
    let profiles = sample_profiles(44).await;
    let layout = ProfileLayout::Full;
    let csv = to_csv(&profiles, layout).expect("csv export");

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), layout.headers());

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), profiles.len());

    for (row, profile) in rows.iter().zip(&profiles) {
        for (index, column) in layout.columns().iter().enumerate() {
            assert_eq!(row.get(index), Some(profile.value(*column).as_str()));
        }
        // Leading zero survives as text.
        assert_eq!(row.get(5), Some("01234"));
    }
}

#[tokio::test]
async fn address_layout_round_trips() {
    let profiles = sample_profiles(5).await;
    let csv = to_csv(&profiles, ProfileLayout::Address).expect("csv export");

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    for (row, profile) in reader.records().zip(&profiles) {
        let row = row.expect("row parses");
        assert_eq!(row.len(), 4);
        assert_eq!(row.get(2), Some(profile.address().as_str()));
    }
}

#[tokio::test]
async fn text_report_has_one_block_per_profile() {
    let profiles = sample_profiles(3).await;
    let text = to_text(&profiles, ProfileLayout::Full);

    let blocks: Vec<&str> = text.split("\n\n").filter(|block| !block.is_empty()).collect();
    assert_eq!(blocks.len(), 3);
    for (index, block) in blocks.iter().enumerate() {
        assert!(block.starts_with(&format!("{}.\n   Name: ", index + 1)));
        assert!(block.contains("   Zip Code: 01234"));
    }
}
