#[path = "components/dialog_component.rs"]
mod dialog_component;


#[path = "components/portal_layer.rs"]
mod portal_layer;
