mod test_hooks;
mod test_rotation_cycles;
