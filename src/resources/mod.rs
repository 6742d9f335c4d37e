//! Managed resources, one module per PingFederate configuration object.

mod authentication_api_settings;
mod data_store;
mod idp_adapter;
mod local_identity_profile;
mod notification_publisher;
mod oauth_auth_server_settings_scopes_exclusive_scopes;
mod oauth_client;
mod oauth_client_registration_policy;
mod plugin_instance;
mod protocol_metadata_lifetime_settings;
mod server_settings_ws_trust_sts_settings;
mod virtual_host_names;

use std::sync::Arc;

use crate::resource::Resource;

pub use authentication_api_settings::AuthenticationApiSettingsResource;
pub use data_store::DataStoreResource;
pub use idp_adapter::IdpAdapterResource;
pub use local_identity_profile::LocalIdentityProfileResource;
pub use notification_publisher::NotificationPublisherResource;
pub use oauth_auth_server_settings_scopes_exclusive_scopes::OauthAuthServerSettingsScopesExclusiveScopesResource;
pub use oauth_client::OauthClientResource;
pub use oauth_client_registration_policy::OauthClientRegistrationPolicyResource;
pub use plugin_instance::{PluginInstance, PluginInstanceKind, PluginInstanceResource};
pub use protocol_metadata_lifetime_settings::ProtocolMetadataLifetimeSettingsResource;
pub use server_settings_ws_trust_sts_settings::ServerSettingsWsTrustStsSettingsResource;
pub use virtual_host_names::VirtualHostNamesResource;

/// Every resource the provider serves.
pub fn all() -> Vec<Arc<dyn Resource>> {
    vec![
        Arc::new(AuthenticationApiSettingsResource),
        Arc::new(DataStoreResource),
        Arc::new(IdpAdapterResource),
        Arc::new(LocalIdentityProfileResource),
        Arc::new(notification_publisher::resource()),
        Arc::new(OauthAuthServerSettingsScopesExclusiveScopesResource),
        Arc::new(OauthClientResource),
        Arc::new(oauth_client_registration_policy::resource()),
        Arc::new(ProtocolMetadataLifetimeSettingsResource),
        Arc::new(ServerSettingsWsTrustStsSettingsResource),
        Arc::new(VirtualHostNamesResource),
    ]
}
