//! `pingfederate_notification_publisher`.

use super::plugin_instance::{PluginInstanceKind, PluginInstanceResource};
use crate::client::models::NotificationPublisher;

/// Notification publisher plugin instances, such as SMTP publishers.
pub type NotificationPublisherResource = PluginInstanceResource<NotificationPublisher>;

static KIND: PluginInstanceKind = PluginInstanceKind {
    type_name: "notification_publisher",
    path: &["notificationPublishers"],
    id_attribute: "publisher_id",
    thing: "notificationPublisher",
    description: "Resource to create and manage notification publisher plugin instances.",
    id_description: "The ID of the plugin instance. The ID cannot be modified once the instance \
                     is created.",
};

/// The resource.
pub fn resource() -> NotificationPublisherResource {
    PluginInstanceResource::new(&KIND)
}
