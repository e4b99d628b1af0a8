mod full_cycle;
mod safety_preemption;
