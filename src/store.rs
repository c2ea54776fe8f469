use log::{debug, error, o, warn, Logger};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::collection;
use crate::environment::Environment;
use crate::errors::StoreError;
use crate::record::{ImageSource, Record, RecordData, RecordPatch, NO_IMAGE};

/// The single source of truth for every journal screen.
///
/// Every mutation loads the entire collection, applies its change in
/// memory, and writes the entire collection back as one unit. There is
/// no per-record addressing at the storage layer. Mutations hold a
/// per-store lock across that cycle so two read-modify-write passes
/// never interleave; reads run unguarded.
pub struct RecordStore {
    environment: Environment,
    write_guard: Mutex<()>,
}

impl RecordStore {
    /// Creates a new instance over an already-constructed environment.
    pub fn new(environment: Environment) -> Self {
        RecordStore {
            environment,
            write_guard: Mutex::new(()),
        }
    }

    /// Creates a record from the submitted data and appends it to the
    /// collection, resolving the image reference first.
    ///
    /// Image persistence failures never abort creation; the record
    /// falls back to [`NO_IMAGE`]. A collection read or write failure
    /// does fail the operation, and the record is not created.
    pub async fn create(
        &self,
        data: RecordData,
        image: Option<ImageSource>,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let logger = self.environment.logger.new(o!("id" => format!("{}", id)));

        debug!(logger, "Resolving image reference...");
        let image_uri = self.resolve_image(&logger, &id, image).await;

        let record = Record::new(id, OffsetDateTime::now_utc(), image_uri.clone(), data);

        debug!(logger, "Appending record to collection...");
        let result = {
            let _guard = self.write_guard.lock().await;

            self.append(record).await
        };

        if result.is_err() && image_uri != NO_IMAGE {
            // the record never made it in, so don't keep its image around
            self.release_image(&logger, &image_uri).await;
        }

        result.map(|_| id)
    }

    /// Returns every record in insertion order.
    ///
    /// First runs and unreadable data degrade to an empty list rather
    /// than failing the screens that render it.
    pub async fn get_all(&self) -> Vec<Record> {
        match self.load_collection().await {
            Ok(records) => records,
            Err(e) => {
                error!(
                    self.environment.logger,
                    "Could not load collection, treating as empty";
                    "error" => format!("{:?}", e)
                );

                vec![]
            }
        }
    }

    /// Returns the record with the given ID, if present.
    pub async fn get_by_id(&self, id: &Uuid) -> Option<Record> {
        self.get_all().await.into_iter().find(|r| r.id() == id)
    }

    /// Merges the patch over the stored record and writes the
    /// collection back.
    ///
    /// `Ok(false)` strictly means the ID wasn't found, with storage
    /// untouched; a write failure after a successful find surfaces as
    /// an error. The image reference in the patch is stored as given;
    /// re-resolution happens at the caller, not here.
    pub async fn update(&self, id: &Uuid, patch: RecordPatch) -> Result<bool, StoreError> {
        let _guard = self.write_guard.lock().await;

        let mut records = self.load_collection().await?;

        let record = match records.iter_mut().find(|r| r.id() == id) {
            Some(record) => record,
            None => return Ok(false),
        };

        patch.apply(record);

        self.persist_collection(&records).await?;

        Ok(true)
    }

    /// Removes the record, writes the collection back, and releases the
    /// record's image.
    ///
    /// Deleting an ID that isn't there is still a success; callers only
    /// care that it's gone. A failure to release the image is logged
    /// and swallowed rather than failing the delete.
    pub async fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let logger = self.environment.logger.new(o!("id" => format!("{}", id)));

        let _guard = self.write_guard.lock().await;

        debug!(logger, "Removing record from collection...");
        let mut records = self.load_collection().await?;
        let position = records.iter().position(|r| r.id() == id);
        let removed = position.map(|index| records.remove(index));

        self.persist_collection(&records).await?;

        if let Some(record) = removed {
            if record.has_image() {
                debug!(logger, "Releasing attached image...");
                self.release_image(&logger, record.image_uri()).await;
            }
        }

        Ok(true)
    }

    async fn resolve_image(
        &self,
        logger: &Logger,
        id: &Uuid,
        image: Option<ImageSource>,
    ) -> String {
        let source = match image {
            Some(source) => source,
            None => return NO_IMAGE.to_owned(),
        };

        match self.environment.images.attach(id, &source).await {
            Ok(uri) => uri,
            Err(e) => {
                warn!(
                    logger,
                    "Could not persist image, continuing without";
                    "error" => format!("{:?}", e)
                );

                NO_IMAGE.to_owned()
            }
        }
    }

    async fn release_image(&self, logger: &Logger, uri: &str) {
        if let Err(e) = self.environment.images.release(uri).await {
            warn!(logger, "Could not release image"; "error" => format!("{:?}", e));
        }
    }

    async fn append(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self.load_collection().await?;
        records.push(record);

        self.persist_collection(&records).await
    }

    async fn load_collection(&self) -> Result<Vec<Record>, StoreError> {
        match self.environment.backing.load().await? {
            Some(raw) => collection::decode(&raw),
            None => Ok(vec![]),
        }
    }

    async fn persist_collection(&self, records: &[Record]) -> Result<(), StoreError> {
        let raw = collection::encode(records)?;

        self.environment.backing.save(raw).await
    }
}
