//! Framing and structural parsing tests over synthetic byte streams.

mod common;

use std::io::{Cursor, Read, Write};

use chrono::{TimeZone, Utc};
use rugrib::{GribError, Message, ParseError, Section};

use common::{Grib1Builder, grib2_message};

fn collect(data: Vec<u8>) -> Vec<Result<Message, GribError>> {
    rugrib::read(Cursor::new(data)).collect()
}

fn collect_ok(data: Vec<u8>) -> Vec<Message> {
    collect(data)
        .into_iter()
        .map(|result| result.expect("expected a well-formed message"))
        .collect()
}

#[test]
fn a_zero_padded_file_yields_one_message() {
    let message = Grib1Builder::default().build();
    let mut data = vec![0u8; 256];
    data.extend_from_slice(&message);

    let messages = collect_ok(data);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].edition(), 1);
    assert_eq!(messages[0].as_bytes(), &message[..]);
}

#[test]
fn back_to_back_messages_are_all_yielded() {
    let first = Grib1Builder::default().build();
    let second = Grib1Builder {
        data: vec![9, 9, 9, 9],
        ..Grib1Builder::default()
    }
    .build();

    let mut data = first.clone();
    data.extend_from_slice(&second);
    let total = data.len();

    let messages = collect_ok(data);
    assert_eq!(messages.len(), 2);
    let length_sum: usize = messages.iter().map(|m| m.as_bytes().len()).sum();
    assert_eq!(length_sum, total);
}

#[test]
fn framing_is_lossless_modulo_inter_message_zero_padding() {
    let first = Grib1Builder::default().build();
    let second = grib2_message(true, true, (2021, 1, 2, 3, 4, 5));

    let mut data = first.clone();
    data.extend_from_slice(&[0u8; 64]);
    data.extend_from_slice(&second);

    let messages = collect_ok(data);
    let mut concatenated = Vec::new();
    for message in &messages {
        concatenated.extend_from_slice(message.as_bytes());
    }
    let mut expected = first;
    expected.extend_from_slice(&second);
    assert_eq!(concatenated, expected);
}

#[test]
fn a_missing_trailer_is_fatal() {
    let message = Grib1Builder {
        trailer: *b"ABCD",
        ..Grib1Builder::default()
    }
    .build();

    let mut stream = rugrib::read(Cursor::new(message));
    match stream.next() {
        Some(Err(GribError::ParseError(ParseError::EndSectionMismatch))) => {}
        other => panic!("unexpected item: {:?}", other.map(|r| r.map(|_| ()))),
    }
    assert!(stream.next().is_none(), "the iterator must terminate");
}

#[test]
fn garbage_before_the_magic_is_not_a_grib_message() {
    let mut data = b"JUNK".to_vec();
    data.extend_from_slice(&Grib1Builder::default().build());

    let results = collect(data);
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(GribError::ParseError(ParseError::NotGrib))
    ));
}

#[test]
fn gzip_compressed_input_decodes_after_decompression() {
    let message = Grib1Builder::default().build();
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&message).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut decompressed = Vec::new();
    flate2::read::GzDecoder::new(&compressed[..])
        .read_to_end(&mut decompressed)
        .unwrap();

    let messages = collect_ok(decompressed);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].as_bytes(), &message[..]);
}

#[test]
fn reading_from_a_path_records_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.grib");
    std::fs::write(&path, Grib1Builder::default().build()).unwrap();

    let messages: Vec<_> = rugrib::read_from_path(&path)
        .unwrap()
        .map(|result| result.unwrap())
        .collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].source().unwrap().ends_with("synthetic.grib"));
}

#[test]
fn edition_1_time_folds_century_and_year() {
    let message = Grib1Builder::default().build();
    let messages = collect_ok(message);
    assert_eq!(
        messages[0].time().unwrap(),
        Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 0).unwrap()
    );

    // A year of century of 100 marks the last year of the century.
    let message = Grib1Builder {
        year_of_century: 100,
        century: 20,
        ..Grib1Builder::default()
    }
    .build();
    let messages = collect_ok(message);
    assert_eq!(
        messages[0].time().unwrap(),
        Utc.with_ymd_and_hms(2000, 6, 1, 12, 30, 0).unwrap()
    );
}

#[test]
fn edition_1_sections_are_index_addressable() {
    let message = Grib1Builder::default().build();
    let messages = collect_ok(message);
    let message = &messages[0];

    for index in [0, 1, 2, 4, 5] {
        assert!(message.section(index).is_some(), "section {index}");
    }
    assert!(message.section(3).is_none(), "no bit-map was encoded");
    assert!(message.section(6).is_none());

    let indicator = message.section(0).unwrap();
    assert_eq!(indicator.offset(), 0);
    assert_eq!(indicator.len(), 8);
    assert_eq!(&indicator.octets()[..4], b"GRIB");

    let end = message.section(5).unwrap();
    assert_eq!(end.octets(), b"7777");
    assert_eq!(end.offset() + end.len(), message.as_bytes().len());
}

#[test]
fn edition_2_messages_parse_structurally() {
    let data = grib2_message(true, true, (2016, 8, 22, 2, 0, 30));
    let messages = collect_ok(data);
    let message = &messages[0];

    assert_eq!(message.edition(), 2);
    assert_eq!(
        message.time().unwrap(),
        Utc.with_ymd_and_hms(2016, 8, 22, 2, 0, 30).unwrap()
    );
    for index in 0..=8 {
        assert!(message.section(index).is_some(), "section {index}");
    }
    assert!(message.section(9).is_none());
}

#[test]
fn absent_edition_2_sections_come_back_as_none() {
    let data = grib2_message(false, false, (2016, 8, 22, 2, 0, 0));
    let messages = collect_ok(data);
    let message = &messages[0];

    assert!(message.section(2).is_none());
    assert!(message.section(5).is_none());
    assert!(message.section(3).is_some());
    assert!(message.section(6).is_some());
}

#[test]
fn edition_2_values_and_coordinates_are_unsupported() {
    let data = grib2_message(false, true, (2016, 8, 22, 2, 0, 0));
    let messages = collect_ok(data);
    let message = &messages[0];

    assert!(matches!(message.values(), Err(GribError::NotSupported(_))));
    assert!(matches!(
        message.coordinates(),
        Err(GribError::NotSupported(_))
    ));

    match &messages[0] {
        Message::Edition2(inner) => {
            assert_eq!(inner.identification().centre(), 98);
            assert_eq!(inner.grid_description().number_of_data_points(), 4);
            assert_eq!(inner.bit_map().bit_map_indicator(), 255);
        }
        Message::Edition1(_) => unreachable!(),
    }
}

#[test]
fn mixed_editions_frame_in_source_order() {
    let mut data = Grib1Builder::default().build();
    data.extend_from_slice(&grib2_message(false, false, (2016, 1, 1, 0, 0, 0)));
    data.extend_from_slice(&Grib1Builder::default().build());

    let editions: Vec<_> = collect_ok(data).iter().map(Message::edition).collect();
    assert_eq!(editions, vec![1, 2, 1]);
}
