use bytes::{Bytes, BytesMut};
use emberwire_s101::{
    encode_frame, Body, FrameReader, FrameWriter, Message, PacketAssembler, StreamDecoder,
    StreamEncoder, BOF, CE, EOF,
};

fn framed(payload: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_frame(payload, &mut buf);
    buf.to_vec()
}

#[test]
fn test_marker_payload_survives_byte_at_a_time() {
    let payload = [0x01, BOF, 0x02];
    let wire = framed(&payload);

    let mut decoder = StreamDecoder::new();
    let mut calls = Vec::new();
    for &byte in &wire {
        decoder.read_byte(byte, |frame| calls.push(frame.to_vec()));
    }
    assert_eq!(calls, vec![payload.to_vec()]);
}

#[test]
fn test_every_single_bit_flip_is_dropped() {
    let payload = b"\x60\x03\x6b\x01\x00";
    let wire = framed(payload);
    let next = framed(b"next");

    for index in 1..wire.len() - 1 {
        for bit in 0..8 {
            let mut corrupted = wire.clone();
            corrupted[index] ^= 1 << bit;

            let mut decoder = StreamDecoder::new();
            let mut frames = Vec::new();
            decoder.read(&corrupted, |frame| frames.push(frame.to_vec()));
            assert!(frames.is_empty(), "byte {index} bit {bit} delivered {frames:02X?}");

            frames.clear();
            decoder.read(&next, |frame| frames.push(frame.to_vec()));
            assert_eq!(frames, vec![b"next".to_vec()], "byte {index} bit {bit}");
        }
    }
}

#[test]
fn test_marker_bit_flips() {
    let payload = b"\x60\x03\x6b\x01\x00";
    let wire = framed(payload);
    let next = framed(b"next");
    let last = wire.len() - 1;

    for (index, marker) in [(0, BOF), (last, EOF)] {
        for bit in 0..8 {
            let mut corrupted = wire.clone();
            corrupted[index] ^= 1 << bit;
            let flipped = corrupted[index];

            let mut decoder = StreamDecoder::new();
            let mut frames = Vec::new();
            decoder.read(&corrupted, |frame| frames.push(frame.to_vec()));
            let mut following = Vec::new();
            decoder.read(&next, |frame| following.push(frame.to_vec()));

            let context = format!("marker {marker:02X} bit {bit} -> {flipped:02X}");
            if flipped == EOF {
                // A leading end marker closes an empty frame; the real one
                // still decodes.
                assert_eq!(frames, vec![payload.to_vec()], "{context}");
            } else {
                assert!(frames.is_empty(), "{context}");
            }
            if flipped == CE {
                // The escape consumes the next start marker, so the
                // following frame is lost as well.
                assert!(following.is_empty(), "{context}");
            } else {
                assert_eq!(following, vec![b"next".to_vec()], "{context}");
            }

            let mut recovered = Vec::new();
            decoder.read(&next, |frame| recovered.push(frame.to_vec()));
            assert_eq!(recovered, vec![b"next".to_vec()], "{context}");
        }
    }
}

#[test]
fn test_resync_on_start_marker_after_garbage() {
    let mut wire = vec![0x00, 0x13, CE, 0x42, EOF, 0x77];
    wire.extend(framed(b"first"));
    wire.extend([0x01, 0x02, 0x03]);
    wire.extend(framed(b"second"));

    for chunk_size in [1, 2, 3, 7, wire.len()] {
        let mut decoder = StreamDecoder::new();
        let mut frames = Vec::new();
        for chunk in wire.chunks(chunk_size) {
            decoder.read(chunk, |frame| frames.push(frame.to_vec()));
        }
        assert_eq!(
            frames,
            vec![b"first".to_vec(), b"second".to_vec()],
            "chunk size {chunk_size}"
        );
    }
}

#[test]
fn test_encoder_output_is_free_of_bare_markers() {
    let payload: Vec<u8> = (0..=255).collect();
    let mut encoder = StreamEncoder::new();
    encoder.append(&payload);
    encoder.finish();

    let wire = encoder.take();
    let body = &wire[1..wire.len() - 1];
    assert!(body.iter().all(|&byte| byte != BOF && byte != EOF));
    let escapes = body.iter().filter(|&&byte| byte == CE).count();
    assert!(escapes >= 8);

    let mut decoder = StreamDecoder::new();
    let mut frames = Vec::new();
    decoder.read(&wire, |frame| frames.push(frame.to_vec()));
    assert_eq!(frames, vec![payload]);
}

#[test]
fn test_multi_packet_message_over_a_stream() {
    let glow = Bytes::from((0..3000u32).map(|i| (i % 251) as u8).collect::<Vec<u8>>());
    let mut writer = FrameWriter::new(Vec::new());
    for message in Message::split_ember_data(0, &glow, 1024) {
        writer.write_message(&message).unwrap();
    }
    writer.write_message(&Message::keep_alive_request(0)).unwrap();

    let wire = writer.into_inner();
    let mut reader = FrameReader::new(wire.as_slice());
    let mut assembler = PacketAssembler::new();
    let mut payloads = Vec::new();
    let mut keep_alives = 0;

    for _ in 0..4 {
        match reader.read_message().unwrap().body {
            Body::EmberData(data) => payloads.extend(assembler.push(&data)),
            Body::KeepAliveRequest => keep_alives += 1,
            Body::KeepAliveResponse => panic!("unexpected keep-alive response"),
        }
    }

    assert_eq!(payloads, vec![glow]);
    assert_eq!(keep_alives, 1);
}
