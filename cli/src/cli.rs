use std::path::Path;

use rugrib::Message;

pub(crate) fn messages<P>(path: P) -> anyhow::Result<Vec<Message>>
where
    P: AsRef<Path>,
{
    let mut collected = Vec::new();
    for message in rugrib::read_from_path(path)? {
        collected.push(message?);
    }
    if collected.is_empty() {
        anyhow::bail!("no GRIB messages found");
    }
    Ok(collected)
}

pub(crate) fn time_string(message: &Message) -> String {
    match message.time() {
        Ok(time) => time.to_string(),
        Err(_) => "(invalid)".to_owned(),
    }
}
