//! Protobuf wire encoding for `Song` and `PlayEvent`.
//!
//! The encoding follows proto3 wire format:
//! - Each field is encoded as (tag, value) pairs
//! - Tag = (field_number << 3) | wire_type
//! - Wire types used here: 0=varint (int64), 2=length-delimited (string)
//!
//! Field numbers come from [`crate::proto_gen`], so bytes produced here always
//! match the schema text registered for the topic.

use crate::error::EncodeError;
use crate::play_event::PlayEvent;
use crate::proto_gen::{
    generate_proto, ProtoField, PLAY_EVENT_DURATION, PLAY_EVENT_FIELDS, PLAY_EVENT_SONG_ID,
    PROTO_PACKAGE, SONG_ALBUM, SONG_ARTIST, SONG_BIOGRAPHY, SONG_FIELDS, SONG_GENRE, SONG_ID,
    SONG_NAME, SONG_YOUTUBE_URI,
};
use crate::song::Song;
use protobuf::{CodedInputStream, CodedOutputStream};

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

const WIRE_VARINT: u32 = 0;
const WIRE_FIXED64: u32 = 1;
const WIRE_LENGTH_DELIMITED: u32 = 2;
const WIRE_FIXED32: u32 = 5;

/// A value that travels on a feed as a single protobuf message.
pub trait ProtoRecord: Sized {
    /// Message name used in the generated schema.
    const MESSAGE_NAME: &'static str;
    /// Field table shared by the encoder and the schema generator.
    const FIELDS: &'static [ProtoField];

    fn encode_to_vec(&self) -> Result<Vec<u8>>;

    fn decode_from_slice(bytes: &[u8]) -> Result<Self>;

    /// The .proto text describing this message.
    fn proto_schema() -> String {
        generate_proto(Self::MESSAGE_NAME, Self::FIELDS, PROTO_PACKAGE)
    }
}

impl ProtoRecord for Song {
    const MESSAGE_NAME: &'static str = "Song";
    const FIELDS: &'static [ProtoField] = SONG_FIELDS;

    fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut stream = CodedOutputStream::vec(&mut buffer);
            stream.write_int64(SONG_ID.number, self.id)?;
            stream.write_string(SONG_ALBUM.number, &self.album)?;
            stream.write_string(SONG_ARTIST.number, &self.artist)?;
            stream.write_string(SONG_NAME.number, &self.name)?;
            stream.write_string(SONG_GENRE.number, &self.genre)?;
            stream.write_string(SONG_YOUTUBE_URI.number, &self.youtube_uri)?;
            stream.write_string(SONG_BIOGRAPHY.number, &self.biography)?;
            stream.flush()?;
        }
        Ok(buffer)
    }

    fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let mut song = Song::new(0, "", "", "", "");
        let mut stream = CodedInputStream::from_bytes(bytes);

        while let Some(tag) = stream.read_raw_tag_or_eof().map_err(decode_error)? {
            let (field_number, wire_type) = split_tag(tag);
            if wire_type == WIRE_VARINT && field_number == SONG_ID.number {
                song.id = stream.read_int64().map_err(decode_error)?;
                continue;
            }
            if wire_type != WIRE_LENGTH_DELIMITED {
                skip_field(&mut stream, field_number, wire_type)?;
                continue;
            }
            let target = match field_number {
                n if n == SONG_ALBUM.number => &mut song.album,
                n if n == SONG_ARTIST.number => &mut song.artist,
                n if n == SONG_NAME.number => &mut song.name,
                n if n == SONG_GENRE.number => &mut song.genre,
                n if n == SONG_YOUTUBE_URI.number => &mut song.youtube_uri,
                n if n == SONG_BIOGRAPHY.number => &mut song.biography,
                _ => {
                    skip_field(&mut stream, field_number, wire_type)?;
                    continue;
                }
            };
            *target = stream.read_string().map_err(decode_error)?;
        }

        Ok(song)
    }
}

impl ProtoRecord for PlayEvent {
    const MESSAGE_NAME: &'static str = "PlayEvent";
    const FIELDS: &'static [ProtoField] = PLAY_EVENT_FIELDS;

    fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut stream = CodedOutputStream::vec(&mut buffer);
            stream.write_int64(PLAY_EVENT_SONG_ID.number, self.song_id)?;
            stream.write_int64(PLAY_EVENT_DURATION.number, self.duration_ms)?;
            stream.flush()?;
        }
        Ok(buffer)
    }

    fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let mut event = PlayEvent::new(0, 0);
        let mut stream = CodedInputStream::from_bytes(bytes);

        while let Some(tag) = stream.read_raw_tag_or_eof().map_err(decode_error)? {
            match split_tag(tag) {
                (n, WIRE_VARINT) if n == PLAY_EVENT_SONG_ID.number => {
                    event.song_id = stream.read_int64().map_err(decode_error)?;
                }
                (n, WIRE_VARINT) if n == PLAY_EVENT_DURATION.number => {
                    event.duration_ms = stream.read_int64().map_err(decode_error)?;
                }
                (field_number, wire_type) => skip_field(&mut stream, field_number, wire_type)?,
            }
        }

        Ok(event)
    }
}

fn split_tag(tag: u32) -> (u32, u32) {
    (tag >> 3, tag & 0x7)
}

fn decode_error(err: protobuf::Error) -> EncodeError {
    EncodeError::Decode(err.to_string())
}

/// Skip a field this decoder does not know, so newer producers stay readable.
fn skip_field(stream: &mut CodedInputStream, field_number: u32, wire_type: u32) -> Result<()> {
    let skipped = match wire_type {
        WIRE_VARINT => stream.read_uint64().map(|_| ()),
        WIRE_FIXED64 => stream.read_fixed64().map(|_| ()),
        WIRE_LENGTH_DELIMITED => stream.read_bytes().map(|_| ()),
        WIRE_FIXED32 => stream.read_fixed32().map(|_| ()),
        _ => {
            return Err(EncodeError::UnsupportedWireType {
                field_number,
                wire_type,
            })
        }
    };
    skipped.map_err(decode_error)
}
