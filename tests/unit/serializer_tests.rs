/*!
 * Tests for sample serialization
 */

use manmask::app_config::TagConfig;
use manmask::dataset::{Combination, CombinationGenerator, SampleSerializer};
use manmask::document::{Document, SampleRecord};

fn ls_document() -> Document {
    Document::from_sections(
        "ls",
        [
            ("NAME", "ls - list directory contents"),
            ("OPTIONS", "-a  do not ignore entries starting with ."),
        ],
    )
}

#[test]
fn test_serialize_withLsExample_shouldProduceTaggedRecords() {
    let document = ls_document();
    let serializer = SampleSerializer::new(TagConfig::default());
    let records: Vec<SampleRecord> = CombinationGenerator::new(document.titles())
        .iter()
        .map(|combination| serializer.serialize(&document, &combination))
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].input, "<SECTION>NAME</SECTION>\nls - list directory contents");
    assert_eq!(
        records[0].output,
        "<SECTION>OPTIONS</SECTION>\n-a  do not ignore entries starting with ."
    );
    assert_eq!(records[1].input, records[0].output);
    assert_eq!(records[1].output, records[0].input);
}

#[test]
fn test_serialize_withUnorderedTitles_shouldUseDocumentOrder() {
    let document = Document::from_sections("x", [("A", "a"), ("B", "b"), ("C", "c")]);
    let combination = Combination {
        input_titles: vec!["C".to_string(), "A".to_string()],
        output_titles: vec!["B".to_string()],
    };
    let record = SampleSerializer::new(TagConfig::default()).serialize(&document, &combination);

    assert_eq!(record.input, "<SECTION>A</SECTION>\na\n<SECTION>C</SECTION>\nc");
    assert_eq!(record.output, "<SECTION>B</SECTION>\nb");
}

#[test]
fn test_serialize_withUntrimmedContent_shouldTrimContent() {
    let document = Document::from_sections("x", [("A", "\n  a  \n"), ("B", "b\n\n")]);
    let combination = Combination {
        input_titles: vec!["A".to_string()],
        output_titles: vec!["B".to_string()],
    };
    let record = SampleSerializer::new(TagConfig::default()).serialize(&document, &combination);

    assert_eq!(record.input, "<SECTION>A</SECTION>\na");
    assert_eq!(record.output, "<SECTION>B</SECTION>\nb");
}

#[test]
fn test_serialize_withCustomTags_shouldUseThem() {
    let tags = TagConfig {
        open: "[[".to_string(),
        close: "]]".to_string(),
    };
    let document = ls_document();
    let combination = Combination {
        input_titles: vec!["NAME".to_string()],
        output_titles: vec!["OPTIONS".to_string()],
    };
    let record = SampleSerializer::new(tags).serialize(&document, &combination);

    assert_eq!(record.input, "[[NAME]]\nls - list directory contents");
}

#[test]
fn test_sample_record_json_shouldHaveInputAndOutputKeys() {
    let record = SampleRecord {
        input: "<SECTION>NAME</SECTION>\nls".to_string(),
        output: "<SECTION>OPTIONS</SECTION>\n-a".to_string(),
    };
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(
        json,
        r#"{"input":"<SECTION>NAME</SECTION>\nls","output":"<SECTION>OPTIONS</SECTION>\n-a"}"#
    );
}
