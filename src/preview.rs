//! Upload preview: thumbnails for images, a filename line for everything else.
//!
//! Image reads run concurrently and land in completion order. Each new
//! selection bumps a generation counter so reads finishing after the user
//! picked different files are dropped.

use crate::is_image_mime;
use futures::stream::{FuturesUnordered, StreamExt};
use log::warn;
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

/// A file from the picker. `handle` is whatever the reader needs.
#[derive(Debug, Clone)]
pub struct SelectedFile<H> {
    pub name: String,
    pub mime: String,
    pub handle: H,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewItem {
    Thumbnail { name: String, data_url: String },
    FileName(String),
    /// The browser could not read the file.
    Unreadable { name: String, reason: String },
}

/// Emit a preview item for every file.
///
/// Non-images are emitted straight away, in selection order; images once
/// `read` resolves, in whatever order the reads complete.
pub async fn read_previews<H, F, Fut>(
    files: Vec<SelectedFile<H>>,
    mut read: F,
    mut emit: impl FnMut(PreviewItem),
) where
    F: FnMut(H) -> Fut,
    Fut: Future<Output = Result<String, String>>,
{
    let mut pending = FuturesUnordered::new();
    for file in files {
        if is_image_mime(&file.mime) {
            let name = file.name;
            let reading = read(file.handle);
            pending.push(async move { (name, reading.await) });
        } else {
            emit(PreviewItem::FileName(file.name));
        }
    }

    while let Some((name, result)) = pending.next().await {
        match result {
            Ok(data_url) => emit(PreviewItem::Thumbnail { name, data_url }),
            Err(reason) => {
                warn!("Preview read failed for {}: {}", name, reason);
                emit(PreviewItem::Unreadable { name, reason });
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewAction {
    /// Clear the area for a new selection.
    Reset(u64),
    Append(u64, PreviewItem),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewState {
    pub generation: u64,
    pub items: Vec<PreviewItem>,
}

impl PreviewState {
    pub fn apply(mut self, action: PreviewAction) -> Self {
        match action {
            PreviewAction::Reset(generation) => {
                self.generation = generation;
                self.items.clear();
            }
            PreviewAction::Append(generation, item) => {
                if generation == self.generation {
                    self.items.push(item);
                }
            }
        }
        self
    }

    pub fn thumbnail_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, PreviewItem::Thumbnail { .. }))
            .count()
    }
}

impl Reducible for PreviewState {
    type Action = PreviewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new((*self).clone().apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;

    fn file(name: &str, mime: &str, handle: usize) -> SelectedFile<usize> {
        SelectedFile {
            name: name.into(),
            mime: mime.into(),
            handle,
        }
    }

    #[tokio::test]
    async fn thumbnails_follow_completion_order() {
        let (tx_a, rx_a) = oneshot::channel::<Result<String, String>>();
        let (tx_b, rx_b) = oneshot::channel::<Result<String, String>>();
        let mut receivers = vec![Some(rx_a), Some(rx_b)];

        let mut state = PreviewState::default().apply(PreviewAction::Reset(1));
        let files = vec![file("a.png", "image/png", 0), file("b.jpg", "image/jpeg", 1)];

        let reader = read_previews(
            files,
            |idx: usize| {
                let rx = receivers[idx].take().expect("each file read once");
                async move { rx.await.unwrap_or_else(|_| Err("cancelled".into())) }
            },
            |item| state = std::mem::take(&mut state).apply(PreviewAction::Append(1, item)),
        );
        let driver = async {
            tx_b.send(Ok("data:b".into())).unwrap();
            tokio::task::yield_now().await;
            tx_a.send(Ok("data:a".into())).unwrap();
        };
        futures::join!(reader, driver);

        assert_eq!(state.thumbnail_count(), 2);
        assert_eq!(
            state.items,
            vec![
                PreviewItem::Thumbnail {
                    name: "b.jpg".into(),
                    data_url: "data:b".into()
                },
                PreviewItem::Thumbnail {
                    name: "a.png".into(),
                    data_url: "data:a".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn non_images_and_failures_render_lines() {
        let mut items = Vec::new();
        let files = vec![
            file("report.pdf", "application/pdf", 0),
            file("broken.png", "image/png", 1),
        ];
        read_previews(
            files,
            |_| async { Err::<String, String>("NotReadableError".into()) },
            |item| items.push(item),
        )
        .await;

        assert_eq!(
            items,
            vec![
                PreviewItem::FileName("report.pdf".into()),
                PreviewItem::Unreadable {
                    name: "broken.png".into(),
                    reason: "NotReadableError".into()
                },
            ]
        );
    }

    #[test]
    fn stale_reads_are_dropped() {
        let thumb = PreviewItem::Thumbnail {
            name: "old.png".into(),
            data_url: "data:old".into(),
        };
        let state = PreviewState::default()
            .apply(PreviewAction::Reset(1))
            .apply(PreviewAction::Append(1, PreviewItem::FileName("x".into())))
            .apply(PreviewAction::Reset(2))
            .apply(PreviewAction::Append(1, thumb));
        assert_eq!(state.generation, 2);
        assert!(state.items.is_empty());
    }
}
