use crate::helpers::fakes::{FakePcmSink, FakeSinkHandle, FakeSynthesizer, FakeSynthesizerHandle};
use crate::helpers::system_voices;

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use voxstream_reader::infrastructure::audio::{AudioPlayer, OnEnded, SynthesisFailure};

fn player() -> (AudioPlayer, FakeSinkHandle, FakeSynthesizerHandle) {
    let (sink, sink_handle) = FakePcmSink::new();
    let (synthesizer, synthesizer_handle) = FakeSynthesizer::new(system_voices());
    let player = AudioPlayer::new(Box::new(sink), Box::new(synthesizer));
    (player, sink_handle, synthesizer_handle)
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() -> OnEnded) {
    let count = Arc::new(AtomicUsize::new(0));
    let shared = count.clone();
    let make = move || -> OnEnded {
        let count = shared.clone();
        Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    };
    (count, make)
}

/// 100 ms of 16-bit silence at 24 kHz
fn silence() -> Vec<u8> {
    vec![0u8; 4_800]
}

#[test]
fn it_should_complete_zero_length_buffer_exactly_once() {
    let (mut player, sink, _) = player();
    let (count, on_ended) = counter();

    player.play_pcm(&[], 1.0, on_ended()).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(sink.started().is_empty());
    assert!(!player.is_playing());
    assert!(!sink.finish());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn it_should_complete_malformed_buffer() {
    let (mut player, sink, _) = player();
    let (count, on_ended) = counter();

    player.play_pcm(&[0, 1, 2], 1.0, on_ended()).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(sink.started().is_empty());
}

#[test]
fn it_should_play_buffer_with_volume_as_gain() {
    let (mut player, sink, _) = player();
    let (count, on_ended) = counter();

    player.play_pcm(&silence(), 0.5, on_ended()).unwrap();

    let started = sink.started();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].samples, 2_400);
    assert_eq!(started[0].gain, 0.5);
    assert!(player.is_playing());

    assert!(sink.finish());
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!player.is_playing());
}

#[test]
fn it_should_stop_buffer_without_completion() {
    let (mut player, sink, _) = player();
    let (count, on_ended) = counter();

    player.play_pcm(&silence(), 1.0, on_ended()).unwrap();
    let slot = sink.pending_slot().expect("buffer should be pending");

    player.stop();
    player.stop();

    // a completion racing the stop must not get through
    assert!(!slot.fire());
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(sink.halts(), 1);
    assert!(!player.is_playing());
}

#[test]
fn it_should_stop_when_nothing_plays() {
    let (mut player, sink, synthesizer) = player();

    player.stop();

    assert_eq!(sink.halts(), 0);
    assert_eq!(synthesizer.cancels(), 0);
}

#[test]
fn it_should_silence_utterance_when_buffer_starts() {
    let (mut player, sink, synthesizer) = player();
    let (utterance_count, on_utterance_end) = counter();
    let (buffer_count, on_buffer_end) = counter();

    player
        .play_utterance("First.", None, 1.0, 1.0, on_utterance_end())
        .unwrap();
    player.play_pcm(&silence(), 1.0, on_buffer_end()).unwrap();

    assert!(synthesizer.cancels() >= 1);
    assert_eq!(sink.started().len(), 1);
    assert_eq!(utterance_count.load(Ordering::SeqCst), 0);
    assert_eq!(buffer_count.load(Ordering::SeqCst), 0);
}

#[test]
fn it_should_halt_buffer_when_utterance_starts() {
    let (mut player, sink, synthesizer) = player();
    let (buffer_count, on_buffer_end) = counter();
    let (utterance_count, on_utterance_end) = counter();

    player.play_pcm(&silence(), 1.0, on_buffer_end()).unwrap();
    player
        .play_utterance("Second.", None, 1.0, 1.0, on_utterance_end())
        .unwrap();

    assert_eq!(sink.halts(), 1);
    assert_eq!(synthesizer.spoken_texts(), vec!["Second.".to_string()]);
    assert_eq!(buffer_count.load(Ordering::SeqCst), 0);

    assert!(synthesizer.finish());
    assert_eq!(utterance_count.load(Ordering::SeqCst), 1);
}

#[test]
fn it_should_suppress_benign_synthesis_errors() {
    let (mut player, _, synthesizer) = player();
    let (count, on_ended) = counter();

    player
        .play_utterance("Interrupted.", None, 1.0, 1.0, on_ended())
        .unwrap();
    assert!(synthesizer.fail(SynthesisFailure::Interrupted));
    assert_eq!(count.load(Ordering::SeqCst), 0);

    player
        .play_utterance("Canceled.", None, 1.0, 1.0, on_ended())
        .unwrap();
    assert!(synthesizer.fail(SynthesisFailure::Canceled));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn it_should_complete_on_other_synthesis_errors() {
    let (mut player, _, synthesizer) = player();
    let (count, on_ended) = counter();

    player
        .play_utterance("Broken.", None, 1.0, 1.0, on_ended())
        .unwrap();
    assert!(synthesizer.fail(SynthesisFailure::Other("audio-busy".to_string())));

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn it_should_pass_voice_rate_and_volume_to_utterance() {
    let (mut player, _, synthesizer) = player();
    let (_, on_ended) = counter();
    let voice = system_voices().remove(1);

    player
        .play_utterance("Hallo.", Some(voice.clone()), 1.5, 0.25, on_ended())
        .unwrap();

    let spoken = synthesizer.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].voice, Some(voice));
    assert_eq!(spoken[0].rate, 1.5);
    assert_eq!(spoken[0].volume, 0.25);
}

#[test]
fn it_should_route_pause_and_resume_to_active_backend() {
    let (mut player, sink, synthesizer) = player();
    let (_, on_ended) = counter();

    player.pause();
    assert_eq!(sink.suspends() + synthesizer.pauses(), 0);

    player.play_pcm(&silence(), 1.0, on_ended()).unwrap();
    player.pause();
    player.resume();
    assert_eq!(sink.suspends(), 1);
    assert_eq!(sink.resumes(), 1);

    player
        .play_utterance("Spoken.", None, 1.0, 1.0, on_ended())
        .unwrap();
    player.pause();
    player.resume();
    assert_eq!(synthesizer.pauses(), 1);
    assert_eq!(synthesizer.resumes(), 1);
}
