use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cvr_osc::general::banner;
use cvr_osc::general::stdin_handler::spawn_stdin_handler;
use cvr_osc::{logging, Config, OscInterface, StartOptions};

/// Console for the ChilloutVR OSC mod: prints everything the mod sends and
/// lets you send avatar, parameter and input commands.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Only open the send socket once something is sent
    #[arg(long)]
    no_sender: bool,

    /// Don't listen for messages from the mod
    #[arg(long)]
    no_receiver: bool,

    /// Don't print the starting messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    match run() {
        Ok(_) => (),
        Err(err) => banner::print_error(&format!("Error: {}", err)),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load_or_default(&args.config)?;
    let log = logging::init(&config.log);

    let osc = Arc::new(OscInterface::new(config.osc.clone()));
    register_printers(&osc);

    let mut options = StartOptions {
        sender: !args.no_sender,
        receiver: !args.no_receiver,
        ..StartOptions::default()
    };
    if args.quiet {
        options = options.quiet();
    }
    osc.start(options)?;

    // Inform the mod that a new OSC server is listening, so it resends all the cached state
    if !args.no_receiver {
        osc.send_config_reset()?;
    }

    banner::print_quick_help();
    let stdin_handle = spawn_stdin_handler(osc.clone(), Some(log))?;
    let _ = stdin_handle.join();

    println!("Closing connections and exiting...");
    osc.stop();
    Ok(())
}

fn register_printers(osc: &OscInterface) {
    osc.on_avatar_changed(|data| {
        println!(
            "The avatar has been changed to: {} (config: {})",
            data.avatar_guid, data.avatar_json_config_path
        );
    });
    osc.on_avatar_parameter_changed(|data| {
        println!(
            "The parameter {} has changed to the value: {}",
            data.parameter_name, data.parameter_value
        );
    });
    osc.on_avatar_parameter_changed_legacy(|data| {
        println!(
            "[legacy] The parameter {} has changed to the value: {}",
            data.parameter_name, data.parameter_value
        );
    });
    osc.on_prop_created(|data| {
        println!(
            "The prop {} has been spawned with the instance id {} ({} sub-sync transforms)",
            data.prop_guid, data.prop_instance_id, data.prop_sub_sync_transform_count
        );
    });
    osc.on_prop_deleted(|data| {
        println!(
            "The prop {} with the instance id {} has been deleted!",
            data.prop_guid, data.prop_instance_id
        );
    });
    osc.on_prop_availability_changed(|data| {
        println!(
            "The prop {} with the instance id {} is {} available!",
            data.prop_guid,
            data.prop_instance_id,
            if data.prop_is_available { "now" } else { "NOT" }
        );
    });
    osc.on_prop_parameter_changed(|data| {
        println!(
            "The prop {} ({}) parameter {} has changed to the value: {}",
            data.prop_guid, data.prop_instance_id, data.prop_sync_name, data.prop_sync_value
        );
    });
    osc.on_tracking_device_status_changed(|data| {
        println!(
            "Tracking device type: {} named: {} index: {} has been {}!",
            data.device_type,
            data.device_steam_vr_name,
            data.device_steam_vr_index,
            if data.device_is_connected { "connected" } else { "disconnected" }
        );
    });
    // Location and tracking data arrive every frame, so only at debug level
    osc.on_prop_location_updated(|data| {
        tracing::debug!(
            prop = %data.prop_guid,
            instance = %data.prop_instance_id,
            pos = %data.prop_position,
            rot = %data.prop_euler_rotation,
            "prop location"
        );
    });
    osc.on_prop_location_sub_updated(|data| {
        tracing::debug!(
            prop = %data.prop_guid,
            index = data.prop_sub_sync_index,
            pos = %data.prop_position,
            rot = %data.prop_euler_rotation,
            "prop sub-sync location"
        );
    });
    osc.on_tracking_play_space_data_updated(|data| {
        tracing::debug!(
            pos = %data.play_space_position,
            rot = %data.play_space_euler_rotation,
            "play space location"
        );
    });
    osc.on_tracking_device_data_updated(|data| {
        tracing::debug!(
            device = %data.device_type,
            name = %data.device_steam_vr_name,
            pos = %data.device_position,
            battery = data.device_battery_percentage,
            "tracking device data"
        );
    });
}
