use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fusha_core::audio::{AudioCatalog, AudioKey, VoiceRole};
use fusha_core::model::{LessonId, PhraseId};
use services::{AudioConfig, AudioError, AudioLoad, AudioService};

/// Minimal HTTP responder: `/slow/` paths wait before answering, paths
/// containing `missing` get a 404, `rejected` a 400, `broken` a 500, and
/// everything else returns a tiny body.
fn spawn_object_store() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            thread::spawn(move || {
                let mut buf = Vec::new();
                let mut chunk = [0_u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf).to_string();
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                if path.contains("/slow/") {
                    thread::sleep(Duration::from_millis(400));
                }
                let status = if path.contains("missing") {
                    Some("404 Not Found")
                } else if path.contains("rejected") {
                    Some("400 Bad Request")
                } else if path.contains("broken") {
                    Some("500 Internal Server Error")
                } else {
                    None
                };
                let response = if let Some(status) = status {
                    format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                } else {
                    "HTTP/1.1 200 OK\r\nContent-Type: audio/mpeg\r\nContent-Length: 3\r\nConnection: close\r\n\r\nID3"
                        .to_string()
                };
                let _ = stream.write_all(response.as_bytes());
            });
        }
    });
    format!("http://{addr}")
}

fn service(base: &str) -> AudioService {
    let mut mapping = AudioCatalog::new();
    mapping.insert(
        AudioKey::lesson(LessonId::new("a1-m1-l1"), VoiceRole::Male),
        "lessons/a1-m1-l1/male.mp3",
    );
    mapping.insert(
        AudioKey::phrase(PhraseId::new("kitab"), VoiceRole::Female),
        "phrases/missing/female.mp3",
    );
    mapping.insert(
        AudioKey::phrase(PhraseId::new("slow"), VoiceRole::Male),
        "slow/phrase.mp3",
    );
    mapping.insert(
        AudioKey::phrase(PhraseId::new("qalam"), VoiceRole::Male),
        "phrases/rejected/male.mp3",
    );
    mapping.insert(
        AudioKey::phrase(PhraseId::new("bayt"), VoiceRole::Male),
        "phrases/broken/male.mp3",
    );
    let config = AudioConfig::new(base, "lesson-audio", Duration::from_secs(5)).unwrap();
    AudioService::new(Some(config), mapping).unwrap()
}

#[tokio::test]
async fn mapped_recording_is_fetched() {
    let svc = service(&spawn_object_store());
    let key = AudioKey::lesson(LessonId::new("a1-m1-l1"), VoiceRole::Male);

    match svc.load(&key).await {
        AudioLoad::Ready(clip) => {
            assert_eq!(clip.bytes, b"ID3");
            assert_eq!(clip.content_type.as_deref(), Some("audio/mpeg"));
            assert_eq!(clip.object_key, "lessons/a1-m1-l1/male.mp3");
        }
        other => panic!("expected ready clip, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_object_disables_playback() {
    let svc = service(&spawn_object_store());
    let key = AudioKey::phrase(PhraseId::new("kitab"), VoiceRole::Female);
    assert!(svc.has_recording(&key));
    assert!(matches!(
        svc.load(&key).await,
        AudioLoad::Unavailable(AudioError::NotFound(_))
    ));
}

#[tokio::test]
async fn bad_request_is_treated_as_missing() {
    let svc = service(&spawn_object_store());
    let key = AudioKey::phrase(PhraseId::new("qalam"), VoiceRole::Male);
    match svc.load(&key).await {
        AudioLoad::Unavailable(AudioError::NotFound(object_key)) => {
            assert_eq!(object_key, "phrases/rejected/male.mp3");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_reports_status() {
    let svc = service(&spawn_object_store());
    let key = AudioKey::phrase(PhraseId::new("bayt"), VoiceRole::Male);
    match svc.load(&key).await {
        AudioLoad::Unavailable(AudioError::HttpStatus(status)) => {
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn newer_load_supersedes_pending_one() {
    let svc = Arc::new(service(&spawn_object_store()));
    let slow_key = AudioKey::phrase(PhraseId::new("slow"), VoiceRole::Male);
    let fast_key = AudioKey::lesson(LessonId::new("a1-m1-l1"), VoiceRole::Male);

    let pending = {
        let svc = Arc::clone(&svc);
        tokio::spawn(async move { svc.load(&slow_key).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(svc.load(&fast_key).await.is_ready());
    assert!(matches!(pending.await.unwrap(), AudioLoad::Superseded));
}

#[tokio::test]
async fn timeout_reports_unavailable() {
    let base = spawn_object_store();
    let mut mapping = AudioCatalog::new();
    let key = AudioKey::phrase(PhraseId::new("slow"), VoiceRole::Male);
    mapping.insert(key.clone(), "slow/phrase.mp3");
    let config = AudioConfig::new(&base, "lesson-audio", Duration::from_millis(50)).unwrap();
    let svc = AudioService::new(Some(config), mapping).unwrap();

    assert!(matches!(
        svc.load(&key).await,
        AudioLoad::Unavailable(AudioError::Timeout)
    ));
}
