use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing_subscriber::EnvFilter;

use proteus_framing::codec::ProteusCodec;
use proteus_framing::frame::Frame;
use proteus_framing::header::FrameFlags;
use proteus_framing::payload::Payload;
use proteus_framing::serializer::v1_0::SerializerV1_0;
use proteus_framing::serializer::{create, create_autodetected, create_with_preallocate};
use proteus_framing::version::ProtocolVersion;

/// Installs a real subscriber (rather than the default no-op) so that the
/// `trace!`/`debug!` calls on the decode-failure paths below run through an
/// actual `env-filter`-driven dispatcher instead of being compiled out.
/// Idempotent: later calls in the same test binary just no-op.
fn install_test_subscriber() {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

#[cfg(test)]
mod dispatch {
    use super::*;

    #[test]
    fn create_rejects_unknown_version() {
        let err = create(ProtocolVersion::new(9, 9)).unwrap_err();
        assert_eq!(err, proteus_framing::FramingError::VersionMismatch);
    }

    #[test]
    fn create_autodetected_selects_v1_0_from_a_broker_setup_prelude() {
        let serializer = create(ProtocolVersion::new(1, 0)).unwrap();
        let frame = Frame::broker_setup(FrameFlags::EMPTY, 0, 1).unwrap();
        let mut bytes = serializer.serialize(frame).unwrap().into_bytes();
        bytes.extend_from_slice(&[0, 0]); // pad past the minimum 10-byte autodetect window
        let detected = create_autodetected(&Bytes::from(bytes), 0).unwrap();
        assert_eq!(detected.protocol_version(), ProtocolVersion::new(1, 0));
    }

    #[test]
    fn create_autodetected_fails_on_a_non_setup_prelude() {
        let serializer = create(ProtocolVersion::new(1, 0)).unwrap();
        let frame = Frame::shard(1).unwrap();
        let mut bytes = serializer.serialize(frame).unwrap().into_bytes();
        bytes.extend_from_slice(&[0; 6]);
        let err = create_autodetected(&Bytes::from(bytes), 0).unwrap_err();
        assert_eq!(err, proteus_framing::FramingError::VersionMismatch);
    }
}

#[cfg(test)]
mod end_to_end {
    use super::*;

    #[test]
    fn a_setup_then_a_destination_round_trip_through_the_transport_codec() {
        let serializer = create_with_preallocate(ProtocolVersion::new(1, 0), true).unwrap();
        assert!(serializer.preallocate_frame_size_field());

        let mut codec = ProteusCodec::new(create(ProtocolVersion::new(1, 0)).unwrap());
        let setup = Frame::broker_setup(FrameFlags::new(FrameFlags::LEASE), 0, 64).unwrap();
        let payload = Payload::new(Some(Bytes::from_static(b"hello")), Some(Bytes::from_static(b"route")));
        let destination = Frame::destination(FrameFlags::new(FrameFlags::METADATA), 7, payload).unwrap();

        let mut wire = BytesMut::new();
        codec.encode(setup.clone(), &mut wire).unwrap();
        codec.encode(destination.clone(), &mut wire).unwrap();

        assert_eq!(codec.decode(&mut wire).unwrap().unwrap(), setup);
        assert_eq!(codec.decode(&mut wire).unwrap().unwrap(), destination);
        assert!(wire.is_empty());
    }

    #[test]
    fn peek_on_an_encoded_frame_matches_its_own_header() {
        let serializer = create(ProtocolVersion::new(1, 0)).unwrap();
        let frame = Frame::broadcast(42).unwrap();
        let bytes = serializer.serialize(frame.clone()).unwrap().into_bytes();

        assert_eq!(serializer.peek_frame_type(&bytes), frame.frame_type());
        assert_eq!(serializer.peek_stream_id(&bytes), Some(frame.stream_id()));
    }
}

#[cfg(test)]
mod logging {
    use super::*;

    #[test]
    fn decode_failure_paths_run_under_a_real_subscriber() {
        install_test_subscriber();
        let serializer = create(ProtocolVersion::new(1, 0)).unwrap();

        // Hits the `debug!` on an empty GROUP body.
        let empty_group = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x11, 0x00]);
        assert!(serializer.deserialize(&empty_group).is_err());

        // Hits the `trace!` on a too-short autodetect window.
        let too_short = Bytes::from_static(&[0x00, 0x00, 0x00, 0x00, 0x04]);
        assert_eq!(SerializerV1_0::detect_protocol_version(&too_short, 0), ProtocolVersion::UNKNOWN);
    }
}
