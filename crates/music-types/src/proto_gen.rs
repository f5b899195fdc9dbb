//! Proto schema generation for the feed value types.
//!
//! The field tables here are the single source of field numbers: the encoder
//! in [`crate::encode`] writes fields by these numbers, and the schema text
//! registered with the schema registry is generated from the same tables.

/// One field of a generated proto3 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtoField {
    pub name: &'static str,
    pub number: u32,
    /// The protobuf scalar type name (e.g., "int64", "string")
    pub proto_type: &'static str,
}

const fn field(name: &'static str, number: u32, proto_type: &'static str) -> ProtoField {
    ProtoField {
        name,
        number,
        proto_type,
    }
}

pub const SONG_ID: ProtoField = field("id", 1, "int64");
pub const SONG_ALBUM: ProtoField = field("album", 2, "string");
pub const SONG_ARTIST: ProtoField = field("artist", 3, "string");
pub const SONG_NAME: ProtoField = field("name", 4, "string");
pub const SONG_GENRE: ProtoField = field("genre", 5, "string");
pub const SONG_YOUTUBE_URI: ProtoField = field("youtube_uri", 6, "string");
pub const SONG_BIOGRAPHY: ProtoField = field("biography", 7, "string");

pub const SONG_FIELDS: &[ProtoField] = &[
    SONG_ID,
    SONG_ALBUM,
    SONG_ARTIST,
    SONG_NAME,
    SONG_GENRE,
    SONG_YOUTUBE_URI,
    SONG_BIOGRAPHY,
];

pub const PLAY_EVENT_SONG_ID: ProtoField = field("song_id", 1, "int64");
pub const PLAY_EVENT_DURATION: ProtoField = field("duration", 2, "int64");

pub const PLAY_EVENT_FIELDS: &[ProtoField] = &[PLAY_EVENT_SONG_ID, PLAY_EVENT_DURATION];

/// Package used for every generated message.
pub const PROTO_PACKAGE: &str = "kafkamusic";

/// Generate .proto file content for a single message.
pub fn generate_proto(message_name: &str, fields: &[ProtoField], package_name: &str) -> String {
    let mut proto = String::new();

    proto.push_str("syntax = \"proto3\";\n");
    proto.push_str(&format!("package {package_name};\n\n"));

    proto.push_str(&format!("message {message_name} {{\n"));
    for field in fields {
        proto.push_str(&format!(
            "  {} {} = {};\n",
            field.proto_type, field.name, field.number
        ));
    }
    proto.push_str("}\n");

    proto
}
