//! Publisher implementation.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use larkdown_parser::{Document, PendingImage, PendingTable, parse};

use crate::api::DocumentApi;
use crate::assets::AssetResolver;
use crate::blocks::block_to_json;

use super::PublishConfig;
use super::PublishTarget;
use super::error::PublishError;
use super::result::{PublishOutcome, PublishResult};

/// Handles publishing markdown files as Feishu documents.
pub struct DocumentPublisher<'a, A: DocumentApi> {
    api: &'a A,
    config: PublishConfig,
}

impl<'a, A: DocumentApi> DocumentPublisher<'a, A> {
    /// Create a new publisher.
    #[must_use]
    pub fn new(api: &'a A, config: PublishConfig) -> Self {
        Self { api, config }
    }

    /// Publish a markdown file as a new document.
    ///
    /// The file's base name (minus extension) becomes the document title.
    /// When duplicate checking is enabled and a folder is available, a
    /// same-named item short-circuits with [`PublishOutcome::Duplicate`].
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or when the
    /// document or its destination cannot be created. Content-mutation
    /// failures after creation are logged and skipped instead.
    pub fn publish(
        &self,
        md_path: &Path,
        target: &PublishTarget,
    ) -> Result<PublishOutcome, PublishError> {
        let content = std::fs::read_to_string(md_path)?;
        let title = document_title(md_path);
        let doc = parse(&content);

        if self.config.check_duplicate
            && let Some(folder) = self.duplicate_check_folder(target)
            && let Some(existing) = self
                .api
                .list_documents(folder)
                .into_iter()
                .find(|f| f.name == title)
        {
            info!("Found existing document '{title}' ({})", existing.token);
            return Ok(PublishOutcome::Duplicate {
                token: existing.token,
                title,
            });
        }

        let (document_id, parent_block, node_token) = match target {
            PublishTarget::Space => {
                let (id, root) = self.api.create_document(&title, None)?;
                (id, root, None)
            }
            PublishTarget::Folder(folder) => {
                let (id, root) = self.api.create_document(&title, Some(folder))?;
                (id, root, None)
            }
            PublishTarget::Wiki {
                space_id,
                node_token,
            } => {
                let space_id =
                    self.resolve_wiki_space(space_id.as_deref(), node_token.as_deref())?;
                let (id, node) =
                    self.api
                        .create_wiki_document(&title, &space_id, node_token.as_deref())?;
                // The wiki obj_token is the document id and its root block.
                (id.clone(), id, Some(node))
            }
        };

        let uploaded_images = self.write_blocks(&document_id, &parent_block, md_path, &doc);

        Ok(PublishOutcome::Published(PublishResult {
            document_id,
            node_token,
            uploaded_images,
        }))
    }

    /// Overwrite an existing document with a markdown file's content.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or the document's
    /// root block cannot be fetched. Content deletion is best-effort.
    pub fn update(&self, document_id: &str, md_path: &Path) -> Result<PublishResult, PublishError> {
        let content = std::fs::read_to_string(md_path)?;
        let doc = parse(&content);

        let root_block = self.api.document_root_block(document_id)?;
        if !self.api.delete_document_content(document_id) {
            warn!("Could not clear existing content of {document_id}");
        }

        let uploaded_images = self.write_blocks(document_id, &root_block, md_path, &doc);

        Ok(PublishResult {
            document_id: document_id.to_owned(),
            node_token: None,
            uploaded_images,
        })
    }

    /// The folder consulted for duplicate checks.
    fn duplicate_check_folder<'t>(&'t self, target: &'t PublishTarget) -> Option<&'t str> {
        match target {
            PublishTarget::Folder(token) => Some(token),
            _ => self.config.folder_token.as_deref(),
        }
    }

    /// Resolve the wiki space id, via the node token when not configured.
    fn resolve_wiki_space(
        &self,
        space_id: Option<&str>,
        node_token: Option<&str>,
    ) -> Result<String, PublishError> {
        if let Some(id) = space_id
            && !id.is_empty()
        {
            return Ok(id.to_owned());
        }

        if let Some(node) = node_token
            && let Some(id) = self.api.wiki_space_id(node)
        {
            return Ok(id);
        }

        Err(PublishError::Target(
            "wiki space id required: configure wiki.space_id or provide a node token".to_owned(),
        ))
    }

    /// Interleaved write of the block sequence, preserving source order.
    ///
    /// Ordinary blocks accumulate into a batch that is flushed whenever an
    /// image or table position is reached, and once more at the end. The
    /// batching exists purely so special blocks land between the right
    /// neighbors even though they take separate calls.
    ///
    /// Returns the number of images uploaded and bound.
    fn write_blocks(
        &self,
        document_id: &str,
        parent_block: &str,
        md_path: &Path,
        doc: &Document,
    ) -> usize {
        let base_dir = md_path.parent().unwrap_or_else(|| Path::new("."));
        let resolver = AssetResolver::new(
            base_dir.to_path_buf(),
            self.config.image_cache_dir.clone(),
        );

        let image_map: HashMap<usize, &PendingImage> =
            doc.pending_images.iter().map(|p| (p.index, p)).collect();
        let table_map: HashMap<usize, &PendingTable> =
            doc.pending_tables.iter().map(|p| (p.index, p)).collect();

        let mut uploaded = 0;
        let mut batch: Vec<Value> = Vec::new();

        for (i, block) in doc.blocks.iter().enumerate() {
            if let Some(pending) = image_map.get(&i) {
                self.flush(document_id, parent_block, &mut batch);
                if self.place_image(document_id, parent_block, &resolver, pending) {
                    uploaded += 1;
                }
            } else if let Some(pending) = table_map.get(&i) {
                self.flush(document_id, parent_block, &mut batch);
                self.place_table(document_id, parent_block, pending);
            } else if let Some(child) = block_to_json(block) {
                batch.push(child);
            }
        }

        self.flush(document_id, parent_block, &mut batch);
        uploaded
    }

    /// Append the accumulated batch, if any. Partial application on a
    /// failing chunk is tolerated; the walk continues either way.
    fn flush(&self, document_id: &str, parent_block: &str, batch: &mut Vec<Value>) {
        if batch.is_empty() {
            return;
        }
        if let Err(e) = self.api.append_blocks(document_id, parent_block, batch) {
            warn!("Block batch append failed: {e}");
        }
        batch.clear();
    }

    /// Place one image: placeholder, resolve, upload, bind. Any failing
    /// step skips the image and the walk continues.
    fn place_image(
        &self,
        document_id: &str,
        parent_block: &str,
        resolver: &AssetResolver,
        pending: &PendingImage,
    ) -> bool {
        let Some(block_id) = self.api.create_image_block(document_id, parent_block) else {
            warn!("Image block creation failed for {}", pending.source);
            return false;
        };

        let Some(path) = resolver.resolve(&pending.source, pending.origin) else {
            return false;
        };

        let Some(file_token) = self.api.upload_image(&path, &block_id) else {
            warn!("Image upload failed for {}", pending.source);
            return false;
        };

        if self.api.bind_image_token(document_id, &block_id, &file_token) {
            info!("Uploaded image {}", pending.source);
            true
        } else {
            warn!("Image token bind failed for {}", pending.source);
            false
        }
    }

    /// Place one table: create at the grid's dimensions, then populate.
    fn place_table(&self, document_id: &str, parent_block: &str, pending: &PendingTable) {
        let (rows, cols) = pending.dimensions();
        if rows == 0 || cols == 0 {
            warn!("Skipping table with degenerate dimensions ({rows}x{cols})");
            return;
        }

        let Some(table_block) = self.api.create_table(document_id, parent_block, rows, cols)
        else {
            warn!("Table creation failed");
            return;
        };

        self.api.fill_table(document_id, &table_block, &pending.grid);
    }
}

/// Document title: the source file's base name without extension.
fn document_title(md_path: &Path) -> String {
    md_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Untitled")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::error::FeishuError;
    use crate::types::DriveFile;

    use super::*;

    /// Records every call in order; failure switches steer error paths.
    #[derive(Default)]
    struct FakeApi {
        calls: RefCell<Vec<String>>,
        folder_files: Vec<DriveFile>,
        fail_image_block: bool,
        fail_append: bool,
        wiki_space: Option<String>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn log(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }
    }

    impl DocumentApi for FakeApi {
        fn create_document(
            &self,
            _title: &str,
            folder_token: Option<&str>,
        ) -> Result<(String, String), FeishuError> {
            self.log(format!("create_document:{}", folder_token.unwrap_or("-")));
            Ok(("doc1".to_owned(), "doc1".to_owned()))
        }

        fn create_wiki_document(
            &self,
            _title: &str,
            space_id: &str,
            _parent_node_token: Option<&str>,
        ) -> Result<(String, String), FeishuError> {
            self.log(format!("create_wiki:{space_id}"));
            Ok(("doc1".to_owned(), "node1".to_owned()))
        }

        fn wiki_space_id(&self, node_token: &str) -> Option<String> {
            self.log(format!("wiki_space:{node_token}"));
            self.wiki_space.clone()
        }

        fn document_root_block(&self, document_id: &str) -> Result<String, FeishuError> {
            self.log("root_block");
            Ok(document_id.to_owned())
        }

        fn list_documents(&self, _folder_token: &str) -> Vec<DriveFile> {
            self.log("list_documents");
            self.folder_files.clone()
        }

        fn delete_document_content(&self, _document_id: &str) -> bool {
            self.log("delete_content");
            true
        }

        fn append_blocks(
            &self,
            _document_id: &str,
            _block_id: &str,
            children: &[Value],
        ) -> Result<(), FeishuError> {
            self.log(format!("append:{}", children.len()));
            if self.fail_append {
                return Err(FeishuError::Api {
                    code: 99,
                    msg: "nope".to_owned(),
                });
            }
            Ok(())
        }

        fn create_image_block(&self, _document_id: &str, _block_id: &str) -> Option<String> {
            self.log("image_block");
            if self.fail_image_block {
                None
            } else {
                Some("img1".to_owned())
            }
        }

        fn upload_image(&self, _path: &Path, _image_block_id: &str) -> Option<String> {
            self.log("upload");
            Some("ftoken".to_owned())
        }

        fn bind_image_token(
            &self,
            _document_id: &str,
            _image_block_id: &str,
            _file_token: &str,
        ) -> bool {
            self.log("bind");
            true
        }

        fn create_table(
            &self,
            _document_id: &str,
            _block_id: &str,
            rows: usize,
            cols: usize,
        ) -> Option<String> {
            self.log(format!("table:{rows}x{cols}"));
            Some("tbl1".to_owned())
        }

        fn fill_table(
            &self,
            _document_id: &str,
            _table_block_id: &str,
            _grid: &[Vec<String>],
        ) -> bool {
            self.log("fill_table");
            true
        }
    }

    /// A markdown source on disk plus a sibling image file.
    fn source_with_image(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        std::fs::write(dir.path().join("pic.png"), b"png bytes").unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    fn config_for(dir: &TempDir) -> PublishConfig {
        PublishConfig {
            check_duplicate: true,
            folder_token: None,
            image_cache_dir: dir.path().join("cache"),
        }
    }

    #[test]
    fn test_publish_interleaves_batches_in_order() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(
            &dir,
            "post.md",
            "# T\npara one\n![i](pic.png)\npara two\n| a | b |\n|---|---|\n| 1 | 2 |\npara three",
        );

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let outcome = publisher.publish(&md, &PublishTarget::Space).unwrap();

        match outcome {
            PublishOutcome::Published(result) => {
                assert_eq!(result.document_id, "doc1");
                assert_eq!(result.uploaded_images, 1);
                assert_eq!(result.node_token, None);
            }
            PublishOutcome::Duplicate { .. } => panic!("unexpected duplicate"),
        }

        // Ordinary batches land strictly before and after the special
        // calls, never out of position.
        assert_eq!(
            api.calls(),
            vec![
                "create_document:-",
                "append:2",
                "image_block",
                "upload",
                "bind",
                "append:1",
                "table:2x2",
                "fill_table",
                "append:1",
            ]
        );
    }

    #[test]
    fn test_publish_into_folder() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "hello");

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        publisher
            .publish(&md, &PublishTarget::Folder("fldr1".to_owned()))
            .unwrap();

        assert_eq!(
            api.calls(),
            vec!["list_documents", "create_document:fldr1", "append:1"]
        );
    }

    #[test]
    fn test_duplicate_short_circuits() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "hello");

        let api = FakeApi {
            folder_files: vec![DriveFile {
                token: "tok-existing".to_owned(),
                name: "post".to_owned(),
                kind: "docx".to_owned(),
            }],
            ..Default::default()
        };
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let outcome = publisher
            .publish(&md, &PublishTarget::Folder("fldr1".to_owned()))
            .unwrap();

        match outcome {
            PublishOutcome::Duplicate { token, title } => {
                assert_eq!(token, "tok-existing");
                assert_eq!(title, "post");
            }
            PublishOutcome::Published(_) => panic!("expected duplicate outcome"),
        }
        assert!(!api.calls().iter().any(|c| c.starts_with("create_document")));
    }

    #[test]
    fn test_duplicate_check_disabled() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "hello");

        let api = FakeApi {
            folder_files: vec![DriveFile {
                token: "tok-existing".to_owned(),
                name: "post".to_owned(),
                kind: "docx".to_owned(),
            }],
            ..Default::default()
        };
        let config = PublishConfig {
            check_duplicate: false,
            ..config_for(&dir)
        };
        let publisher = DocumentPublisher::new(&api, config);
        let outcome = publisher
            .publish(&md, &PublishTarget::Folder("fldr1".to_owned()))
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Published(_)));
        assert!(!api.calls().contains(&"list_documents".to_owned()));
    }

    #[test]
    fn test_no_duplicate_check_without_folder() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "hello");

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        publisher.publish(&md, &PublishTarget::Space).unwrap();

        assert!(!api.calls().contains(&"list_documents".to_owned()));
    }

    #[test]
    fn test_wiki_space_resolved_from_node_token() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "hello");

        let api = FakeApi {
            wiki_space: Some("7034".to_owned()),
            ..Default::default()
        };
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let target = PublishTarget::Wiki {
            space_id: None,
            node_token: Some("wikcn1".to_owned()),
        };
        let outcome = publisher.publish(&md, &target).unwrap();

        match outcome {
            PublishOutcome::Published(result) => {
                assert_eq!(result.node_token.as_deref(), Some("node1"));
            }
            PublishOutcome::Duplicate { .. } => panic!("unexpected duplicate"),
        }
        assert_eq!(
            api.calls(),
            vec!["wiki_space:wikcn1", "create_wiki:7034", "append:1"]
        );
    }

    #[test]
    fn test_wiki_without_space_or_node_fails() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "hello");

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let target = PublishTarget::Wiki {
            space_id: None,
            node_token: None,
        };
        let err = publisher.publish(&md, &target).unwrap_err();

        assert!(matches!(err, PublishError::Target(_)));
    }

    #[test]
    fn test_image_failure_skips_but_continues() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "before\n![i](pic.png)\nafter");

        let api = FakeApi {
            fail_image_block: true,
            ..Default::default()
        };
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let outcome = publisher.publish(&md, &PublishTarget::Space).unwrap();

        match outcome {
            PublishOutcome::Published(result) => assert_eq!(result.uploaded_images, 0),
            PublishOutcome::Duplicate { .. } => panic!("unexpected duplicate"),
        }
        // The trailing paragraph still lands after the failed image.
        assert_eq!(
            api.calls(),
            vec!["create_document:-", "append:1", "image_block", "append:1"]
        );
    }

    #[test]
    fn test_missing_local_image_is_skipped() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("post.md");
        std::fs::write(&md, "![i](missing.png)").unwrap();

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let outcome = publisher.publish(&md, &PublishTarget::Space).unwrap();

        match outcome {
            PublishOutcome::Published(result) => assert_eq!(result.uploaded_images, 0),
            PublishOutcome::Duplicate { .. } => panic!("unexpected duplicate"),
        }
        // Placeholder created, but no upload or bind happened.
        assert_eq!(api.calls(), vec!["create_document:-", "image_block"]);
    }

    #[test]
    fn test_append_failure_does_not_abort_walk() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "one\n![i](pic.png)\ntwo");

        let api = FakeApi {
            fail_append: true,
            ..Default::default()
        };
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let outcome = publisher.publish(&md, &PublishTarget::Space).unwrap();

        assert!(matches!(outcome, PublishOutcome::Published(_)));
        // Both batches were attempted despite failing.
        assert_eq!(
            api.calls()
                .iter()
                .filter(|c| c.starts_with("append"))
                .count(),
            2
        );
    }

    #[test]
    fn test_degenerate_table_is_skipped() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("post.md");
        std::fs::write(&md, "x").unwrap();

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));

        let doc = Document {
            blocks: vec![larkdown_parser::Block::Table { grid: vec![] }],
            pending_images: vec![],
            pending_tables: vec![PendingTable {
                index: 0,
                grid: vec![],
            }],
        };
        publisher.write_blocks("doc1", "doc1", &md, &doc);

        assert!(api.calls().iter().all(|c| !c.starts_with("table")));
    }

    #[test]
    fn test_ragged_table_created_at_max_width() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("post.md");
        std::fs::write(&md, "| a | b | c |\n| d |").unwrap();

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        publisher.publish(&md, &PublishTarget::Space).unwrap();

        assert!(api.calls().contains(&"table:2x3".to_owned()));
    }

    #[test]
    fn test_update_clears_then_writes() {
        let dir = TempDir::new().unwrap();
        let md = source_with_image(&dir, "post.md", "# T\nbody");

        let api = FakeApi::default();
        let publisher = DocumentPublisher::new(&api, config_for(&dir));
        let result = publisher.update("docX", &md).unwrap();

        assert_eq!(result.document_id, "docX");
        assert_eq!(
            api.calls(),
            vec!["root_block", "delete_content", "append:2"]
        );
    }

    #[test]
    fn test_title_from_file_stem() {
        assert_eq!(document_title(Path::new("/tmp/Release Notes.md")), "Release Notes");
        assert_eq!(document_title(Path::new("plain")), "plain");
    }
}
