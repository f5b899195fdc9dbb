//! End-to-end driver runs against the in-memory broker.
//!
//! These exercise the full two-phase workload (catalog load, then paced play
//! events) with a paused tokio clock, so timing assertions are exact and the
//! tests finish instantly.

use kafka_music_driver::{run_workload, WorkloadOptions};
use music_producer::testing::{MemoryBroker, MemorySink, ScriptedIndices};
use music_producer::{
    decode_long_key, LongSerializer, ProtobufSerializer, Publisher, StringSerializer,
};
use music_types::{Catalog, PlayEvent, ProtoRecord, Song, UniformIndices};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const SONG_TOPIC: &str = "song-feed";
const EVENT_TOPIC: &str = "play-events";

fn small_catalog() -> Catalog {
    Catalog::new(vec![
        Song::new(
            1,
            "Fresh Fruit For Rotting Vegetables",
            "Dead Kennedys",
            "Chemical Warfare",
            "Punk",
        ),
        Song::new(2, "We Are the League", "Anti-Nowhere League", "Animal", "Punk"),
        Song::new(3, "Live In A Dive", "Subhumans", "All Gone Dead", "Punk"),
    ])
    .unwrap()
}

fn options(max_events: Option<u64>) -> WorkloadOptions {
    WorkloadOptions {
        interval: Duration::from_millis(100),
        partition_key: "uk".to_string(),
        play_duration_ms: 60_000,
        max_events,
    }
}

fn song_publisher(broker: &MemoryBroker) -> Publisher<i64, Song, MemorySink> {
    Publisher::new(SONG_TOPIC, broker.sink(), LongSerializer, ProtobufSerializer)
}

fn event_publisher(broker: &MemoryBroker) -> Publisher<str, PlayEvent, MemorySink> {
    Publisher::new(EVENT_TOPIC, broker.sink(), StringSerializer, ProtobufSerializer)
}

#[tokio::test(start_paused = true)]
async fn test_catalog_precedes_scripted_play_events() {
    let broker = MemoryBroker::new();
    let catalog = small_catalog();
    let indices = ScriptedIndices::for_ids(&catalog, &[2, 1, 3, 3, 2]).unwrap();

    let report = run_workload(
        &catalog,
        song_publisher(&broker),
        event_publisher(&broker),
        indices,
        &options(Some(5)),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.load.songs_published, 3);
    assert_eq!(report.pacing.events_published, 5);

    let records = broker.records();
    assert_eq!(records.len(), 8);

    // Every song lands before the first play event.
    let (songs, events) = records.split_at(3);
    assert!(songs.iter().all(|r| r.topic == SONG_TOPIC));
    assert!(events.iter().all(|r| r.topic == EVENT_TOPIC));

    let song_ids: Vec<i64> = songs
        .iter()
        .map(|r| decode_long_key(&r.key).unwrap())
        .collect();
    assert_eq!(song_ids, vec![1, 2, 3]);
    for (record, song) in songs.iter().zip(catalog.songs()) {
        assert_eq!(&Song::decode_from_slice(&record.payload).unwrap(), song);
    }

    let played: Vec<PlayEvent> = events
        .iter()
        .map(|r| PlayEvent::decode_from_slice(&r.payload).unwrap())
        .collect();
    let expected: Vec<PlayEvent> = [2, 1, 3, 3, 2]
        .into_iter()
        .map(|id| PlayEvent::new(id, 60_000))
        .collect();
    assert_eq!(played, expected);
    assert!(events.iter().all(|r| r.key == b"uk"));

    for pair in events.windows(2) {
        assert!(pair[1].dispatched_at - pair[0].dispatched_at >= Duration::from_millis(100));
    }
}

#[tokio::test(start_paused = true)]
async fn test_each_publisher_flushed_once() {
    let broker = MemoryBroker::new();
    let catalog = small_catalog();
    let song_sink = broker.sink();
    let event_sink = broker.sink();
    let song_handle = song_sink.clone();
    let event_handle = event_sink.clone();

    run_workload(
        &catalog,
        Publisher::new(SONG_TOPIC, song_sink, LongSerializer, ProtobufSerializer),
        Publisher::new(EVENT_TOPIC, event_sink, StringSerializer, ProtobufSerializer),
        UniformIndices::seeded(11),
        &options(Some(3)),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(song_handle.flush_count(), 1);
    assert_eq!(event_handle.flush_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_stops_builtin_catalog_stream() {
    let broker = MemoryBroker::new();
    let catalog = Catalog::builtin().unwrap();
    let shutdown = CancellationToken::new();

    let canceller = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1_050)).await;
        canceller.cancel();
    });

    let report = run_workload(
        &catalog,
        song_publisher(&broker),
        event_publisher(&broker),
        UniformIndices::seeded(2024),
        &options(None),
        shutdown,
    )
    .await
    .unwrap();

    assert_eq!(report.load.songs_published, catalog.len() as u64);
    assert_eq!(broker.records_for(SONG_TOPIC).len(), catalog.len());

    // Sends at 0, 100, ..., 1000 ms; the interrupt lands during the 11th sleep.
    let events = broker.records_for(EVENT_TOPIC);
    assert_eq!(events.len(), 11);
    assert_eq!(report.pacing.events_published, 11);
    for record in &events {
        let event = PlayEvent::decode_from_slice(&record.payload).unwrap();
        assert!(catalog.contains_id(event.song_id));
        assert_eq!(event.duration_ms, 60_000);
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_catalog_load_sends_no_events() {
    let broker = MemoryBroker::new();
    let catalog = small_catalog();
    let songs = Publisher::new(
        SONG_TOPIC,
        broker.sink().failing_after(2),
        LongSerializer,
        ProtobufSerializer,
    );

    let err = run_workload(
        &catalog,
        songs,
        event_publisher(&broker),
        UniformIndices::seeded(5),
        &options(Some(5)),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Failed to load the song catalog"));
    assert!(broker.records_for(EVENT_TOPIC).is_empty());
}
