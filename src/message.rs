use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a recipient is addressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    #[default]
    To,
    Cc,
    Bcc,
}

/// A single message recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecipientType,
}

impl Recipient {
    /// Creates a `to` recipient with no display name
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            kind: RecipientType::To,
        }
    }

    /// Sets the recipient's display name
    ///
    /// # Arguments
    ///
    /// * `name` - The display name
    ///
    /// # Returns
    ///
    /// The modified recipient for method chaining
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets how the recipient is addressed
    ///
    /// # Arguments
    ///
    /// * `kind` - `to`, `cc` or `bcc`
    ///
    /// # Returns
    ///
    /// The modified recipient for method chaining
    pub fn with_kind(mut self, kind: RecipientType) -> Self {
        self.kind = kind;
        self
    }
}

/// A merge variable: `*|NAME|*` in the content is replaced by `content`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeVar {
    pub name: String,
    pub content: serde_json::Value,
}

impl MergeVar {
    /// Creates a merge variable
    pub fn new(name: impl Into<String>, content: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Merge variables that apply to one recipient only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientMergeVars {
    pub rcpt: String,
    pub vars: Vec<MergeVar>,
}

/// Metadata attached to one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientMetadata {
    pub rcpt: String,
    pub values: IndexMap<String, serde_json::Value>,
}

/// A file attachment or inline image; `content` is base64 encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub name: String,
    pub content: String,
}

impl Attachment {
    /// Creates an attachment
    ///
    /// # Arguments
    ///
    /// * `mime_type` - The MIME type, e.g. `text/plain`
    /// * `name` - The file name shown to the recipient
    /// * `content` - The file content, base64 encoded
    pub fn new(
        mime_type: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// An email message in the shape Mandrill's message endpoints accept
///
/// Only the fields that were set are serialized, so the service applies
/// its own defaults for everything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    pub to: Vec<Recipient>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_clicks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_strip_qs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_recipients: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_content_link: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_path_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_language: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_merge_vars: Vec<MergeVar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merge_vars: Vec<RecipientMergeVars>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub google_analytics_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_analytics_campaign: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_metadata: Vec<RecipientMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Attachment>,
}

impl Message {
    /// Creates a new message
    ///
    /// # Arguments
    ///
    /// * `from_email` - The sender's email address
    /// * `to` - An iterable of recipient email addresses
    /// * `subject` - The email subject line
    ///
    /// # Examples
    ///
    /// ```
    /// use mandrill_client::message::Message;
    ///
    /// let message = Message::new("sender@example.com", vec!["recipient@example.com"], "Hello")
    ///     .with_text("Hello, world!");
    /// assert_eq!(message.to.len(), 1);
    /// ```
    pub fn new(
        from_email: impl Into<String>,
        to: impl IntoIterator<Item = impl Into<String>>,
        subject: impl Into<String>,
    ) -> Self {
        Message {
            from_email: Some(from_email.into()),
            to: to.into_iter().map(Recipient::new).collect(),
            subject: Some(subject.into()),
            ..Default::default()
        }
    }

    /// Sets the plain text body of the message
    ///
    /// # Arguments
    ///
    /// * `text` - The plain text content of the message
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the HTML body of the message
    ///
    /// # Arguments
    ///
    /// * `html` - The HTML content of the message
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Sets the sender's display name
    ///
    /// # Arguments
    ///
    /// * `from_name` - The name shown next to the sender address
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_from_name(mut self, from_name: impl Into<String>) -> Self {
        self.from_name = Some(from_name.into());
        self
    }

    /// Adds a recipient; use this for `cc`/`bcc` or named recipients
    pub fn with_recipient(mut self, recipient: Recipient) -> Self {
        self.to.push(recipient);
        self
    }

    /// Adds an extra header to the message
    ///
    /// # Arguments
    ///
    /// * `name` - The header name, e.g. `Reply-To`
    /// * `value` - The header value
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Turns on open and click tracking
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_tracking(mut self) -> Self {
        self.track_opens = Some(true);
        self.track_clicks = Some(true);
        self
    }

    /// Adds a tag for filtering in Mandrill's reports
    ///
    /// # Arguments
    ///
    /// * `tag` - The tag to add
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a merge variable for all recipients and turns merging on
    ///
    /// # Arguments
    ///
    /// * `var` - The merge variable
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_global_merge_var(mut self, var: MergeVar) -> Self {
        self.merge = Some(true);
        self.global_merge_vars.push(var);
        self
    }

    /// Adds a metadata entry stored with the message
    ///
    /// # Arguments
    ///
    /// * `name` - The metadata key
    /// * `value` - The metadata value
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Adds a file attachment
    ///
    /// # Arguments
    ///
    /// * `attachment` - The attachment, base64 encoded
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds an inline image referenced by `cid:` in the HTML body
    ///
    /// # Arguments
    ///
    /// * `image` - The image, base64 encoded
    ///
    /// # Returns
    ///
    /// The modified message for method chaining
    pub fn with_image(mut self, image: Attachment) -> Self {
        self.images.push(image);
        self
    }
}

/// The request body for sending a [`Message`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub key: String,
    pub message: Message,
    #[serde(rename = "async")]
    pub send_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_pool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<String>,
}

impl SendMessageRequest {
    /// Wraps a message with the API key, with `async` off and no schedule
    pub fn new(key: impl Into<String>, message: Message) -> Self {
        Self {
            key: key.into(),
            message,
            send_async: false,
            ip_pool: None,
            send_at: None,
        }
    }
}
