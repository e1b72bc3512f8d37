use {
    call_cache::*,
    parking_lot::Mutex,
    std::{io, sync::Arc, time::Duration},
    tokio::time,
    tracing::Level,
};

// Collects everything written by the subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock()).lines().map(String::from).collect()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buffer);
        Ok(buffer.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn background_refresh_logs_carry_key() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _subscriber = tracing::subscriber::set_default(subscriber);

    let cache = CallCache::<u32, String>::new(
        CallCacheConfiguration::default().expire_after(Duration::from_secs(60)).refresh_after(Duration::from_secs(10)),
    );

    assert_eq!(cache.invoke("refreshed".into(), || async { Ok(1) }).await, Ok(1));
    time::advance(Duration::from_secs(15)).await;
    assert_eq!(cache.invoke("refreshed".into(), || async { Ok(2) }).await, Ok(1));
    time::sleep(Duration::from_millis(1)).await;
    assert_eq!(cache.peek(&"refreshed".into()).await, Some(2));

    let lines = captured.lines();
    assert!(
        lines.iter().any(|line| line.contains("background refresh")
            && line.contains(r#"key="refreshed""#)
            && line.ends_with("updated")),
        "{:#?}",
        lines
    );
}
