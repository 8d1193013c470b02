//! The library page: upload form, song table and player together.
//!
//! The player's current index is the only record of which song is selected.
//! Row highlighting is read from it, never stored separately.

use core_library::Song;
use core_playback::{MediaElement, Player};
use tracing::debug;

use crate::api::SongsApiClient;
use crate::error::Result;
use crate::library::LibraryView;
use crate::upload::UploadForm;

pub struct LibraryPage<E: MediaElement> {
    view: LibraryView,
    upload: UploadForm,
    player: Player<E>,
}

impl<E: MediaElement> LibraryPage<E> {
    pub fn new(element: E) -> Self {
        Self::with_upload_form(element, UploadForm::new())
    }

    pub fn with_upload_form(element: E, upload: UploadForm) -> Self {
        Self {
            view: LibraryView::new(),
            upload,
            player: Player::new(element),
        }
    }

    pub fn view(&self) -> &LibraryView {
        &self.view
    }

    pub fn upload_form(&self) -> &UploadForm {
        &self.upload
    }

    pub fn upload_form_mut(&mut self) -> &mut UploadForm {
        &mut self.upload
    }

    pub fn player(&self) -> &Player<E> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player<E> {
        &mut self.player
    }

    /// The player is shown once there is something to play.
    pub fn shows_player(&self) -> bool {
        !self.view.songs().is_empty()
    }

    /// Initial fetch. A failed fetch is reported through the view's status.
    pub async fn load(&mut self, api: &SongsApiClient) -> Result<()> {
        if self.view.load(api).await {
            self.player.set_queue(self.view.songs().to_vec()).await?;
        }
        Ok(())
    }

    pub async fn retry(&mut self, api: &SongsApiClient) -> Result<()> {
        if self.view.retry(api).await {
            self.player.set_queue(self.view.songs().to_vec()).await?;
        }
        Ok(())
    }

    /// Append a freshly uploaded song. The first song of an empty library is
    /// selected.
    pub async fn song_added(&mut self, song: Song) -> Result<()> {
        let was_empty = self.view.songs().is_empty();
        self.view.song_added(song);
        self.player.set_queue(self.view.songs().to_vec()).await?;
        if was_empty {
            debug!("First song added; selecting it");
            self.player.select(0).await?;
        }
        Ok(())
    }

    /// Submit the upload form and add the stored song on success.
    pub async fn submit_upload(&mut self, api: &SongsApiClient) -> Result<bool> {
        let mut added = None;
        self.upload.submit(api, |song| added = Some(song)).await;

        match added {
            Some(song) => {
                self.song_added(song).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// A row was clicked.
    pub async fn select(&mut self, index: usize) -> Result<()> {
        self.player.select(index).await?;
        Ok(())
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.player.current_index() == Some(index)
    }
}
