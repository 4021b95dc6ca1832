use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Resource, api::PostParams};

/// This `Client` can be used to access Kubernetes.
/// It wraps an underlying [`kube::Client`] and applies the configured field manager to every
/// create and replace request sent by [`reconcile::push`](crate::reconcile::push).
#[derive(Clone)]
pub struct Client {
    client: kube::Client,
    post_params: PostParams,
}

impl Client {
    pub fn new(client: kube::Client, field_manager: Option<String>) -> Self {
        Client {
            client,
            post_params: PostParams {
                field_manager,
                ..PostParams::default()
            },
        }
    }

    /// Returns a [`kube::Client`] that can be freely used.
    /// It does not need to be cloned before first use.
    pub fn as_kube_client(&self) -> kube::Client {
        self.client.clone()
    }

    pub fn post_params(&self) -> &PostParams {
        &self.post_params
    }

    /// Returns an [`Api`] for cluster scoped objects, like namespaces.
    pub fn get_all_api<T>(&self) -> Api<T>
    where
        T: Resource<DynamicType = ()>,
    {
        Api::all(self.client.clone())
    }

    /// Returns an [`Api`] for objects in `namespace`, or in the client's default namespace if
    /// none is given.
    pub fn get_namespaced_api<T>(&self, namespace: Option<&str>) -> Api<T>
    where
        T: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        match namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::default_namespaced(self.client.clone()),
        }
    }
}
