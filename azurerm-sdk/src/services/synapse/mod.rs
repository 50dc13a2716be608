pub mod workspace_aad_admins;
