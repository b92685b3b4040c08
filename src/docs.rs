// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Petshop ---
        handlers::petshop::create_petshop,
        handlers::petshop::update_petshop,
        handlers::petshop::get_petshop,
        handlers::petshop::list_petshops,
        handlers::petshop::micro_get_petshop,

        // --- Configuration ---
        handlers::configuration::create_configuration,
        handlers::configuration::update_configuration,
        handlers::configuration::get_configuration,
        handlers::configuration::micro_get_configuration,
        handlers::configuration::client_get_configuration,

        // --- Responsible Person ---
        handlers::responsible_person::create_responsible_person,
        handlers::responsible_person::update_responsible_person,
        handlers::responsible_person::get_responsible_person,
        handlers::responsible_person::worker_get_concise_responsible_person,

        // --- Client ---
        handlers::client::create_client,
        handlers::client::update_client,
        handlers::client::update_client_cpf,
        handlers::client::update_client_self,
        handlers::client::get_client,
        handlers::client::list_clients,
        handlers::client::check_scheduled_client_data,
        handlers::client::micro_check_client_petshops,
        handlers::client::micro_get_client_petshop,

        // --- Worker ---
        handlers::worker::create_worker,
        handlers::worker::update_worker,
        handlers::worker::get_worker,
        handlers::worker::list_workers,
        handlers::worker::list_worker_names,
        handlers::worker::micro_check_worker_petshop,

        // --- Email Block ---
        handlers::email_block::is_user_blocked,
        handlers::email_block::list_blocked,
        handlers::email_block::block,
        handlers::email_block::release,
    ),
    components(
        schemas(
            // --- Users ---
            models::user::User,
            models::user::PetshopSummary,
            models::user::ConciseUser,
            models::user::UserGraph,
            models::user::EmailBlockStatus,

            // --- Addresses ---
            models::address::Address,
            models::address::AddressSummary,
            models::address::AddressPayload,
            models::address::AddressUpdatePayload,

            // --- Pets ---
            models::pet::BodySize,
            models::pet::FurSize,
            models::pet::Pet,
            models::pet::PetSummary,
            models::pet::PetPayload,

            // --- Relations ---
            models::relation::ClientPetshopRelation,
            models::relation::WorkerPetshopRelation,
            models::relation::ClientPetshopInfo,
            models::relation::ClientInfoSummary,
            models::relation::ClientInfoPayload,

            // --- Petshop ---
            models::petshop::PetshopConfiguration,
            models::petshop::ClientConfigurationView,
            models::petshop::CreateConfigurationPayload,
            models::petshop::UpdateConfigurationPayload,
            models::petshop::ResponsiblePerson,
            models::petshop::ResponsiblePersonWithPetshop,
            models::petshop::ResponsiblePersonPayload,
            models::petshop::PetshopUserPayload,
            models::petshop::CreatePetshopPayload,
            models::petshop::PetshopUserUpdatePayload,
            models::petshop::UpdatePetshopPayload,
            models::petshop::CreatedPetshop,
            models::petshop::UpdatedPetshop,

            // --- Client ---
            models::client::ClientUserPayload,
            models::client::ClientPayload,
            models::client::CreatedClient,
            models::client::UpdatedClient,
            models::client::ClientSelfUpdatePayload,
            models::client::ClientCpfPayload,
            models::client::ClientPetshopView,
            models::client::ClientSelfView,
            models::client::ScheduledClientCheckPayload,
            models::client::ScheduledClientData,

            // --- Worker ---
            models::worker::CreateWorkerPayload,
            models::worker::UpdateWorkerPayload,
            models::worker::WorkerResponse,
        )
    ),
    tags(
        (name = "Petshop", description = "Cadastro e dados do petshop"),
        (name = "Configuration", description = "Regras de pagamento e cancelamento"),
        (name = "Responsible Person", description = "Responsável legal pelo petshop"),
        (name = "Client", description = "Clientes e seus vínculos com petshops"),
        (name = "Worker", description = "Colaboradores dos petshops"),
        (name = "Email Block", description = "Bloqueio de envio de e-mails")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
