use std::path::PathBuf;

use anyhow::Result;

use crate::api::{ApiClient, ContentForm, ContentRecord, MediaRef};

/// An in-progress edit of one content record.
///
/// The draft snapshots the record at open time and accumulates changes
/// locally; nothing touches the server until [`EditDraft::save`]. The
/// kept-image list and pending uploads are tracked separately, matching
/// the server's update contract: kept images are echoed back as
/// `existing_images` and new files ride along as `images` parts.
pub struct EditDraft {
    record_id: i32,
    section: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub order: i32,
    pub is_active: bool,
    kept_images: Vec<MediaRef>,
    pending_uploads: Vec<(PathBuf, Option<String>)>,
    images_touched: bool,
}

impl EditDraft {
    /// Snapshot a record into a draft.
    pub fn open(record: &ContentRecord) -> Self {
        Self {
            record_id: record.id,
            section: record.section.clone(),
            title: record.title.clone(),
            subtitle: record.subtitle.clone(),
            description: record.description.clone(),
            body: record.body.clone(),
            order: record.order,
            is_active: record.is_active,
            kept_images: record.images.clone(),
            pending_uploads: Vec::new(),
            images_touched: false,
        }
    }

    pub fn record_id(&self) -> i32 {
        self.record_id
    }

    pub fn kept_images(&self) -> &[MediaRef] {
        &self.kept_images
    }

    pub fn pending_uploads(&self) -> &[(PathBuf, Option<String>)] {
        &self.pending_uploads
    }

    /// Queue a file for upload on save. Prior images are untouched; the
    /// server appends the upload after the kept list.
    pub fn attach_upload(&mut self, path: PathBuf, caption: Option<String>) {
        self.pending_uploads.push((path, caption));
    }

    /// Drop one of the record's images from the draft.
    pub fn remove_image(&mut self, index: usize) -> Option<MediaRef> {
        if index >= self.kept_images.len() {
            return None;
        }
        self.images_touched = true;
        Some(self.kept_images.remove(index))
    }

    /// Submit the draft. On success the server's response is the new
    /// authoritative record; the draft is consumed.
    pub fn save(self, api: &ApiClient) -> Result<ContentRecord> {
        // Only send existing_images when the image set is actually
        // changing; an untouched draft must leave stored images alone.
        let existing_images = if self.images_touched || !self.pending_uploads.is_empty() {
            Some(self.kept_images)
        } else {
            None
        };

        api.update_content(
            self.record_id,
            ContentForm {
                section: self.section,
                title: self.title,
                subtitle: self.subtitle,
                description: self.description,
                body: self.body,
                order: self.order,
                is_active: self.is_active,
                existing_images,
                uploads: self.pending_uploads,
            },
        )
    }

    /// Discard the draft. No network call; the record is unchanged.
    pub fn cancel(self) {}
}

/// Split a record body into display lines, the convention used by contact
/// and footer sections (one line each for email, phone, address).
pub fn body_lines(body: &str) -> Vec<&str> {
    body.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect()
}
