//! `pingfederate_oauth_client_registration_policy`.

use super::plugin_instance::{PluginInstanceKind, PluginInstanceResource};
use crate::client::models::ClientRegistrationPolicy;

/// Dynamic client registration policy plugin instances.
pub type OauthClientRegistrationPolicyResource = PluginInstanceResource<ClientRegistrationPolicy>;

static KIND: PluginInstanceKind = PluginInstanceKind {
    type_name: "oauth_client_registration_policy",
    path: &["oauth", "clientRegistrationPolicies"],
    id_attribute: "policy_id",
    thing: "oauthClientRegistrationPolicy",
    description: "Resource to create and manage an OAuth Client Registration Policy.",
    id_description: "The ID of the plugin instance. The ID cannot be modified once the instance \
                     is created.",
};

/// The resource.
pub fn resource() -> OauthClientRegistrationPolicyResource {
    PluginInstanceResource::new(&KIND)
}
